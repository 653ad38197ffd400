//! The predictor runner over files on disk.

use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;

use solvency::model::{LogisticModel, ModelMeta, Node, Tree, TreeModel};
use solvency::testing::{write_gz_json, FixedLabels};
use solvency::{
    make_predictions, predict_table, wrangle, DuplicateIds, Error, LoadError, LoaderConfig, Model,
    PredictError, ReadError, RowId, Verbosity, SERIES_NAME,
};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn data(&self, doc: &Value) -> PathBuf {
        let path = self.dir.path().join("data.json.gz");
        write_gz_json(&path, doc).unwrap();
        path
    }

    fn model(&self, model: &Model) -> PathBuf {
        let path = self.dir.path().join("model.slvc");
        model.save(&path).unwrap();
        path
    }
}

/// Bankrupt when `debt_ratio >= 0.5`.
fn debt_stump() -> Model {
    let tree = Tree::from_nodes(&[
        Node::Split { feature: 0, threshold: 0.5, left: 1, right: 2, default_left: true },
        Node::Leaf { value: 0.0 },
        Node::Leaf { value: 1.0 },
    ])
    .unwrap();
    Model::from(TreeModel::new(ModelMeta::new(["debt_ratio"]), tree).unwrap())
}

#[test]
fn two_companies() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [
        {"company_id": "A1", "debt_ratio": 0.9, "sector": "retail"},
        {"company_id": "A2", "debt_ratio": 0.1, "sector": "energy"},
    ]}));
    let model = fx.model(&debt_stump());

    let series = make_predictions(&data, &model, &LoaderConfig::company_data()).unwrap();

    assert_eq!(series.name(), SERIES_NAME);
    assert_eq!(series.index(), &[RowId::from("A1"), RowId::from("A2")]);
    assert_eq!(series.values().to_vec(), vec![1, 0]);
    assert_eq!(series.get(&RowId::from("A2")), Some(0));
}

#[test]
fn labels_come_back_verbatim_under_their_ids() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [
        {"company_id": "A1", "x1": 0.5},
        {"company_id": "A2", "x1": -0.2},
    ]}));

    let table = wrangle(&data, &LoaderConfig::company_data()).unwrap();
    let series = predict_table(&FixedLabels(vec![0, 1]), &table).unwrap();

    assert_eq!(series.name(), "bankrupt");
    assert_eq!(
        series.to_json(),
        json!({"name": "bankrupt", "index": ["A1", "A2"], "data": [0, 1]})
    );
}

#[test]
fn order_follows_the_file_not_the_ids() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"observations": [
        {"id": 30, "debt_ratio": 0.7},
        {"id": 10, "debt_ratio": 0.2},
        {"id": 20, "debt_ratio": null},
    ]}));
    let model = fx.model(&debt_stump());

    let series = make_predictions(&data, &model, &LoaderConfig::observations()).unwrap();

    assert_eq!(series.index(), &[RowId::Int(30), RowId::Int(10), RowId::Int(20)]);
    // missing debt_ratio follows the default (left) branch
    assert_eq!(series.values().to_vec(), vec![1, 0, 0]);
}

#[test]
fn empty_dataset_gives_empty_series() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": []}));
    let model = fx.model(&Model::from(
        LogisticModel::new(ModelMeta::new(Vec::<String>::new()), Vec::<f64>::new(), 1.0).unwrap(),
    ));

    let series = make_predictions(&data, &model, &LoaderConfig::company_data()).unwrap();
    assert!(series.is_empty());
    assert_eq!(series.name(), "bankrupt");
}

#[test]
fn missing_feature_is_reported_by_the_model() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [{"company_id": "A1", "revenue": 3.0}]}));
    let model = fx.model(&debt_stump());

    let err = make_predictions(&data, &model, &LoaderConfig::company_data()).unwrap_err();
    assert!(
        matches!(err, Error::Predict(PredictError::MissingFeature(ref f)) if f == "debt_ratio"),
        "got: {err:?}"
    );
}

#[test]
fn categorical_feature_is_reported_by_the_model() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [{"company_id": "A1", "debt_ratio": "high"}]}));
    let model = fx.model(&debt_stump());

    let err = make_predictions(&data, &model, &LoaderConfig::company_data()).unwrap_err();
    assert!(
        matches!(err, Error::Predict(PredictError::NonNumericFeature(_))),
        "got: {err:?}"
    );
}

#[test]
fn corrupt_model_file() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [{"company_id": "A1", "debt_ratio": 0.2}]}));
    let model = fx.model(&debt_stump());

    let mut bytes = std::fs::read(&model).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&model, &bytes).unwrap();

    let err = make_predictions(&data, &model, &LoaderConfig::company_data()).unwrap_err();
    assert!(
        matches!(err, Error::Read(ReadError::ChecksumMismatch { .. })),
        "got: {err:?}"
    );
}

#[test]
fn dataset_used_as_model_is_not_a_model() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [{"company_id": "A1", "debt_ratio": 0.2}]}));

    let err = make_predictions(&data, &data, &LoaderConfig::company_data()).unwrap_err();
    assert!(matches!(err, Error::Read(ReadError::NotAModel)), "got: {err:?}");
}

#[test]
fn missing_model_file() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": []}));

    let err = make_predictions(&data, fx.dir.path().join("none.slvc"), &LoaderConfig::company_data())
        .unwrap_err();
    assert!(matches!(err, Error::Read(ReadError::Io(_))), "got: {err:?}");
}

#[test]
fn load_errors_surface_before_the_model_is_read() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": [
        {"company_id": "A1", "debt_ratio": 0.2},
        {"company_id": "A1", "debt_ratio": 0.8},
    ]}));

    let err = make_predictions(&data, fx.dir.path().join("none.slvc"), &LoaderConfig::company_data())
        .unwrap_err();
    assert!(
        matches!(err, Error::Load(LoadError::DuplicateId { first: 0, again: 1, .. })),
        "got: {err:?}"
    );

    let model = fx.model(&debt_stump());
    let config = LoaderConfig::company_data()
        .with_duplicate_ids(DuplicateIds::Keep)
        .with_verbosity(Verbosity::Debug);
    let series = make_predictions(&data, &model, &config).unwrap();
    assert_eq!(series.values().to_vec(), vec![0, 1]);
}

#[test]
fn invalid_config_is_rejected() {
    let fx = Fixture::new();
    let data = fx.data(&json!({"data": []}));
    let model = fx.model(&debt_stump());
    let mut config = LoaderConfig::company_data();
    config.id_key = String::new();

    let err = make_predictions(&data, &model, &config).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got: {err:?}");
}
