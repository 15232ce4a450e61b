//! Integration tests driving the pipeline over on-disk object trees.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use dbgap_core::build_index;
use dbgap_model::RepositoryRef;
use dbgap_store::FsStore;

fn write_dictionary(root: &Path, relative: &str, study_id: &str, variables: usize) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut xml = format!(r#"<data_table study_id="{study_id}" study_name="{study_id} name">"#);
    for index in 0..variables {
        xml.push_str(&format!(
            r#"<variable id="v{index}" dd_id="dd1"><name>VAR{index}</name></variable>"#
        ));
    }
    xml.push_str("</data_table>");
    fs::write(path, xml).unwrap();
}

fn refs(names: &[&str]) -> Vec<RepositoryRef> {
    names
        .iter()
        .map(|name| RepositoryRef::new(*name, "main"))
        .collect()
}

#[test]
fn indexes_studies_across_repositories() {
    let dir = TempDir::new().unwrap();
    write_dictionary(dir.path(), "alpha/main/a/one.xml", "phs000001", 2);
    write_dictionary(dir.path(), "alpha/main/two.xml", "phs000002", 1);
    write_dictionary(dir.path(), "beta/main/one.xml", "phs000001", 3);

    let store = FsStore::new(dir.path());
    let run = build_index(&store, &refs(&["alpha", "beta"])).unwrap();

    assert_eq!(run.index.len(), 2);
    assert_eq!(run.index.record_count(), 3);

    let shared = run.index.studies_for("phs000001");
    assert_eq!(shared.len(), 2);
    assert_eq!(shared[0].repository, "alpha");
    assert_eq!(shared[0].filepath, "alpha/main/a/one.xml");
    assert_eq!(shared[1].repository, "beta");

    assert_eq!(run.stats.len(), 2);
    assert_eq!(run.stats[0].repository, "alpha");
    assert_eq!(run.stats[0].data_dictionaries, 2);
    assert_eq!(run.stats[0].variables, 3);
    assert_eq!(run.stats[1].repository, "beta");
    assert_eq!(run.stats[1].variables, 3);
}

#[test]
fn non_xml_objects_do_not_reach_the_parser() {
    let dir = TempDir::new().unwrap();
    write_dictionary(dir.path(), "alpha/main/dd.xml", "phs000010", 1);
    let extra = dir.path().join("alpha/main/README.md");
    fs::write(extra, "not xml at all <<<").unwrap();

    let store = FsStore::new(dir.path());
    let run = build_index(&store, &refs(&["alpha"])).unwrap();
    assert_eq!(run.index.record_count(), 1);
}

#[test]
fn malformed_xml_aborts_the_run() {
    let dir = TempDir::new().unwrap();
    write_dictionary(dir.path(), "alpha/main/good.xml", "phs000020", 1);
    let bad = dir.path().join("alpha/main/zz-bad.xml");
    fs::write(bad, "<data_table study_id=\"phs000021\"><variable>").unwrap();

    let store = FsStore::new(dir.path());
    let error = build_index(&store, &refs(&["alpha"])).unwrap_err();
    let chain = format!("{error:#}");
    assert!(chain.contains("alpha/main/zz-bad.xml"), "{chain}");
}

#[test]
fn missing_study_id_aborts_the_run_instead_of_skipping() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("alpha/main/anon.xml");
    fs::create_dir_all(bad.parent().unwrap()).unwrap();
    fs::write(bad, "<data_table study_name=\"anonymous\"/>").unwrap();

    let store = FsStore::new(dir.path());
    let error = build_index(&store, &refs(&["alpha"])).unwrap_err();
    let chain = format!("{error:#}");
    assert!(chain.contains("study_id"), "{chain}");
    assert!(chain.contains("alpha/main/anon.xml"), "{chain}");
}

#[test]
fn missing_repository_is_fatal() {
    let dir = TempDir::new().unwrap();
    let store = FsStore::new(dir.path());
    assert!(build_index(&store, &refs(&["ghost"])).is_err());
}

#[test]
fn walking_the_same_repository_twice_doubles_the_records() {
    // Deliberate: re-running over the same tree is surfaced by the
    // reporters, not rejected by the index.
    let dir = TempDir::new().unwrap();
    write_dictionary(dir.path(), "alpha/main/dd.xml", "phs000030", 1);

    let store = FsStore::new(dir.path());
    let run = build_index(&store, &refs(&["alpha", "alpha"])).unwrap();
    assert_eq!(run.index.studies_for("phs000030").len(), 2);
}
