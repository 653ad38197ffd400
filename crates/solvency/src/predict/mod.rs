//! Predictor runner.
//!
//! Load a dataset, load one persisted model, label every row. The runner does
//! not inspect the model's features: a model that needs a column the table
//! lacks reports it through [`PredictError`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::LoaderConfig;
use crate::data::io::Loader;
use crate::data::Table;
use crate::error::Error;
use crate::logger::PipelineLogger;
use crate::model::{Model, Predict, PredictError};

mod series;

pub use series::PredictionSeries;

/// Name given to every series produced by the runner.
pub const SERIES_NAME: &str = "bankrupt";

/// Label every row of `table` with `model`.
///
/// The result has the table's index, in the table's order.
pub fn predict_table<P: Predict + ?Sized>(
    model: &P,
    table: &Table,
) -> Result<PredictionSeries, PredictError> {
    let labels = model.predict(table)?;
    if labels.len() != table.n_rows() {
        return Err(PredictError::LengthMismatch {
            expected: table.n_rows(),
            got: labels.len(),
        });
    }
    PredictionSeries::new(SERIES_NAME, table.index().to_vec(), labels)
}

/// Load `data_path` with `config`, load the model at `model_path`, and predict.
///
/// # Example
///
/// ```no_run
/// use solvency::{make_predictions, LoaderConfig};
///
/// let predictions = make_predictions(
///     "data/taiwan-bankruptcy-data-test.json.gz",
///     "model/model-5-3.slvc",
///     &LoaderConfig::company_data(),
/// )?;
/// for (id, label) in predictions.iter() {
///     println!("{id}: {label}");
/// }
/// # Ok::<(), solvency::Error>(())
/// ```
pub fn make_predictions(
    data_path: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
    config: &LoaderConfig,
) -> Result<PredictionSeries, Error> {
    config.validate()?;
    let logger = PipelineLogger::new(config.verbosity);

    let table = Loader::new(config.clone()).load(data_path)?;

    let model_path = model_path.as_ref();
    let model = {
        let mut reader = BufReader::new(File::open(model_path).map_err(crate::io::ReadError::from)?);
        Model::read_from(&mut reader)?
    };
    logger.model_loaded(model_path, model.kind(), model.n_features());

    let predictions = predict_table(&model, &table)?;
    logger.predictions(predictions.len(), predictions.n_positive());
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, RowId};
    use crate::testing::FixedLabels;

    fn table() -> Table {
        Table::new(
            vec![RowId::from("A1"), RowId::from("A2")],
            vec![Column::numeric("x", vec![0.0, 1.0])],
        )
        .unwrap()
    }

    #[test]
    fn copies_index_and_labels() {
        let series = predict_table(&FixedLabels(vec![1, 0]), &table()).unwrap();
        assert_eq!(series.name(), SERIES_NAME);
        assert_eq!(series.index(), &[RowId::from("A1"), RowId::from("A2")]);
        assert_eq!(series.values().to_vec(), vec![1, 0]);
    }

    #[test]
    fn model_breaking_its_contract_is_reported() {
        let err = predict_table(&FixedLabels(vec![1]), &table()).unwrap_err();
        assert_eq!(err, PredictError::LengthMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn accepts_trait_objects() {
        let model: Box<dyn Predict> = Box::new(FixedLabels(vec![0, 0]));
        let series = predict_table(model.as_ref(), &table()).unwrap();
        assert_eq!(series.n_positive(), 0);
    }

    #[test]
    fn empty_table() {
        let series = predict_table(&FixedLabels(Vec::new()), &Table::empty()).unwrap();
        assert!(series.is_empty());
    }
}
