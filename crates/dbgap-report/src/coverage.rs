//! The cross-repository coverage matrix.

use std::io::Write;

use anyhow::{Context, Result};

use dbgap_core::StudyIndex;
use dbgap_model::{RepositoryRef, Study};

/// Header label for the study identifier column.
const ID_HEADER: &str = "HDPID";

/// Write the coverage matrix as CSV.
///
/// One row per distinct study identifier in ascending lexical order, one
/// column per repository in argument order (a repository that contributed
/// nothing still gets its column), plus a `repository_count` column. A
/// populated cell summarizes what that repository contributed for that
/// identifier.
pub fn write_coverage_matrix<W: Write>(
    index: &StudyIndex,
    repositories: &[RepositoryRef],
    writer: W,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![ID_HEADER.to_string(), "repository_count".to_string()];
    header.extend(repositories.iter().map(|reference| reference.name.clone()));
    csv.write_record(&header).context("write coverage header")?;

    for (study_id, studies) in index.iter() {
        let mut cells = Vec::with_capacity(repositories.len());
        let mut covered = 0usize;
        for reference in repositories {
            let contributed: Vec<&Study> = studies
                .iter()
                .filter(|study| study.repository == reference.name)
                .collect();
            if contributed.is_empty() {
                cells.push(String::new());
            } else {
                covered += 1;
                cells.push(coverage_cell(&contributed));
            }
        }
        let mut record = vec![study_id.to_string(), covered.to_string()];
        record.append(&mut cells);
        csv.write_record(&record)
            .with_context(|| format!("write coverage row for {study_id}"))?;
    }
    csv.flush().context("flush coverage matrix")?;
    Ok(())
}

fn coverage_cell(studies: &[&Study]) -> String {
    let dictionaries = studies.len();
    let sections: usize = studies.iter().map(|study| study.section_count()).sum();
    let variables: usize = studies.iter().map(|study| study.variable_count()).sum();
    format!("{dictionaries} DDs containing {sections} sections containing {variables} variables")
}

#[cfg(test)]
mod tests {
    use super::*;

    use dbgap_model::{Section, Variable};

    fn variable(id: &str) -> Variable {
        Variable {
            dictionary_id: "dd1".to_string(),
            id: id.to_string(),
            name: String::new(),
            title: String::new(),
            description: String::new(),
            data_type: String::new(),
            values: Vec::new(),
        }
    }

    fn study(repository: &str, study_id: &str, variables: usize) -> Study {
        Study {
            repository: repository.to_string(),
            filepath: format!("{repository}/main/{study_id}.xml"),
            study_id: study_id.to_string(),
            study_name: String::new(),
            study_description: String::new(),
            appl_id: String::new(),
            study_version: String::new(),
            sections: vec![Section {
                section_name: "dd1".to_string(),
                variables: (0..variables).map(|i| variable(&format!("v{i}"))).collect(),
            }],
        }
    }

    fn render(index: &StudyIndex, repositories: &[RepositoryRef]) -> String {
        let mut buffer = Vec::new();
        write_coverage_matrix(index, repositories, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn rows(rendered: &str) -> Vec<Vec<String>> {
        rendered
            .lines()
            .map(|line| line.split(',').map(String::from).collect())
            .collect()
    }

    #[test]
    fn header_follows_repository_argument_order() {
        let index = StudyIndex::new();
        let repositories = vec![
            RepositoryRef::new("gamma", "main"),
            RepositoryRef::new("alpha", "main"),
        ];
        let rendered = render(&index, &repositories);
        assert_eq!(rendered, "HDPID,repository_count,gamma,alpha\n");
    }

    #[test]
    fn rows_sort_by_study_id_and_count_covering_repositories() {
        let mut index = StudyIndex::new();
        index.record(study("alpha", "phs2", 1));
        index.record(study("beta", "phs2", 4));
        index.record(study("beta", "phs1", 2));

        let repositories = vec![
            RepositoryRef::new("alpha", "main"),
            RepositoryRef::new("beta", "main"),
        ];
        let rendered = render(&index, &repositories);
        let rows = rows(&rendered);

        assert_eq!(rows[1][0], "phs1");
        assert_eq!(rows[1][1], "1");
        assert_eq!(rows[1][2], "");
        assert_eq!(rows[1][3], "1 DDs containing 1 sections containing 2 variables");

        assert_eq!(rows[2][0], "phs2");
        assert_eq!(rows[2][1], "2");
        assert_eq!(rows[2][2], "1 DDs containing 1 sections containing 1 variables");
        assert_eq!(rows[2][3], "1 DDs containing 1 sections containing 4 variables");
    }

    #[test]
    fn multiple_dictionaries_from_one_repository_aggregate() {
        let mut index = StudyIndex::new();
        index.record(study("alpha", "phs3", 2));
        index.record(study("alpha", "phs3", 3));

        let repositories = vec![RepositoryRef::new("alpha", "main")];
        let rendered = render(&index, &repositories);
        assert!(
            rendered.contains("2 DDs containing 2 sections containing 5 variables"),
            "{rendered}"
        );
    }

    #[test]
    fn uncovered_repository_keeps_an_empty_column() {
        let mut index = StudyIndex::new();
        index.record(study("alpha", "phs4", 1));

        let repositories = vec![
            RepositoryRef::new("alpha", "main"),
            RepositoryRef::new("silent", "main"),
        ];
        let rendered = render(&index, &repositories);
        let rows = rows(&rendered);
        assert_eq!(rows[1][1], "1");
        assert_eq!(rows[1][3], "");
    }
}
