//! Response transformation
//!
//! Normalization rules applied to every annotation record before it is
//! returned to a caller. Rules live in an explicit registered list,
//! applied in declared order; each rule must be independent of the
//! others so registration order never changes the result.

use bioanno_core::AnnotationRecord;
use serde_json::Value;

/// One named normalization rule, mutating a record in place.
pub type TransformRule = fn(&mut AnnotationRecord);

/// Ordered registry of transformation rules.
pub struct ResponseTransformer {
    rules: Vec<(&'static str, TransformRule)>,
}

impl ResponseTransformer {
    /// An empty transformer: only bookkeeping-field removal.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The transformer with all shipped rules registered.
    pub fn with_default_rules() -> Self {
        let mut transformer = Self::new();
        transformer.register("chembl_drug_indications", chembl_drug_indications);
        transformer
    }

    /// Register an additional rule. New rules require no change to the
    /// orchestration logic.
    pub fn register(&mut self, name: &'static str, rule: TransformRule) {
        self.rules.push((name, rule));
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(name, _)| *name)
    }

    /// Normalize one record in place: strip the `query` and `_score`
    /// bookkeeping fields, then apply every registered rule.
    pub fn transform(&self, record: &mut AnnotationRecord) {
        record.remove("query");
        record.remove("_score");
        for (_, rule) in &self.rules {
            rule(record);
        }
    }
}

impl Default for ResponseTransformer {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Prefix `id` to make it a valid curie unless it already carries the
/// prefix. `prefix` excludes the trailing colon.
pub fn append_prefix(id: &str, prefix: &str) -> String {
    if id.starts_with(prefix) {
        id.to_string()
    } else {
        format!("{prefix}:{id}")
    }
}

/// Re-prefix `chembl.drug_indications[].mesh_id` with the MESH namespace.
fn chembl_drug_indications(record: &mut AnnotationRecord) {
    fn mesh_prefix_indications(chembl: &mut Value) {
        let Some(indications) = chembl
            .get_mut("drug_indications")
            .and_then(Value::as_array_mut)
        else {
            return;
        };
        for doc in indications.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(Value::String(mesh_id)) = doc.get("mesh_id") {
                let prefixed = append_prefix(mesh_id, "MESH");
                doc.insert("mesh_id".to_string(), Value::String(prefixed));
            }
        }
    }

    match record.get_mut("chembl") {
        // a list-valued chembl section is rare but possible
        Some(Value::Array(sections)) => {
            for section in sections {
                mesh_prefix_indications(section);
            }
        }
        Some(section) => mesh_prefix_indications(section),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> AnnotationRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_strips_bookkeeping_fields() {
        let mut rec = record(json!({
            "query": "1017",
            "_score": 22.5,
            "symbol": "CDK2"
        }));

        ResponseTransformer::with_default_rules().transform(&mut rec);

        assert!(!rec.contains_key("query"));
        assert!(!rec.contains_key("_score"));
        assert_eq!(rec.get("symbol"), Some(&json!("CDK2")));
    }

    #[test]
    fn test_mesh_prefix_added() {
        let mut rec = record(json!({
            "chembl": {
                "drug_indications": [
                    {"mesh_id": "D014867"},
                    {"mesh_id": "MESH:D000001"},
                    {"efo_id": "EFO:0000270"}
                ]
            }
        }));

        ResponseTransformer::with_default_rules().transform(&mut rec);

        let indications = rec["chembl"]["drug_indications"].as_array().unwrap();
        assert_eq!(indications[0]["mesh_id"], json!("MESH:D014867"));
        // already prefixed ids stay untouched
        assert_eq!(indications[1]["mesh_id"], json!("MESH:D000001"));
        assert!(indications[2].get("mesh_id").is_none());
    }

    #[test]
    fn test_mesh_prefix_on_list_valued_chembl() {
        let mut rec = record(json!({
            "chembl": [
                {"drug_indications": [{"mesh_id": "D001"}]},
                {"drug_indications": [{"mesh_id": "D002"}]}
            ]
        }));

        ResponseTransformer::with_default_rules().transform(&mut rec);

        let sections = rec["chembl"].as_array().unwrap();
        assert_eq!(sections[0]["drug_indications"][0]["mesh_id"], json!("MESH:D001"));
        assert_eq!(sections[1]["drug_indications"][0]["mesh_id"], json!("MESH:D002"));
    }

    #[test]
    fn test_record_without_chembl_passes_through() {
        let mut rec = record(json!({"mondo": {"label": "type 2 diabetes"}}));
        ResponseTransformer::with_default_rules().transform(&mut rec);
        assert_eq!(rec["mondo"]["label"], json!("type 2 diabetes"));
    }

    #[test]
    fn test_append_prefix() {
        assert_eq!(append_prefix("D014867", "MESH"), "MESH:D014867");
        assert_eq!(append_prefix("MESH:D014867", "MESH"), "MESH:D014867");
    }

    #[test]
    fn test_custom_rule_registration() {
        fn drop_taxid(record: &mut AnnotationRecord) {
            record.remove("taxid");
        }

        let mut transformer = ResponseTransformer::with_default_rules();
        transformer.register("drop_taxid", drop_taxid);
        assert!(transformer.rule_names().any(|n| n == "drop_taxid"));

        let mut rec = record(json!({"taxid": 9606, "symbol": "CDK2"}));
        transformer.transform(&mut rec);
        assert!(!rec.contains_key("taxid"));
    }
}
