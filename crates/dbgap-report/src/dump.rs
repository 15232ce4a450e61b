//! Full JSON dump of the study index.

use std::io::Write;

use anyhow::{Context, Result};

use dbgap_core::StudyIndex;

/// Serialize the entire index as pretty-printed JSON: an object keyed by
/// study identifier, each value the list of records that declared it,
/// with their full section/variable/value structure.
pub fn write_index_dump<W: Write>(index: &StudyIndex, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, index).context("serialize study index")?;
    writer.write_all(b"\n").context("write index dump")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use dbgap_model::Study;

    #[test]
    fn dump_is_an_object_keyed_by_study_id() {
        let mut index = StudyIndex::new();
        index.record(Study {
            repository: "alpha".to_string(),
            filepath: "alpha/main/dd.xml".to_string(),
            study_id: "phs1".to_string(),
            study_name: "One".to_string(),
            study_description: String::new(),
            appl_id: String::new(),
            study_version: String::new(),
            sections: Vec::new(),
        });

        let mut buffer = Vec::new();
        write_index_dump(&index, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["phs1"][0]["study_name"], "One");
    }
}
