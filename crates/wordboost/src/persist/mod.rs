//! JSON persistence for [`Ensemble`].
//!
//! Models are written as a versioned [`ModelEnvelope`]. Loading checks the
//! version and the model type, rebuilds the trees and validates the result,
//! so a loaded ensemble is always safe to score with.
//!
//! ```no_run
//! use wordboost::persist;
//! use wordboost::repr::Ensemble;
//!
//! let ensemble = Ensemble::new(0.07);
//! persist::save_json(&ensemble, "model.json")?;
//! let restored = persist::load_json("model.json")?;
//! assert_eq!(restored, ensemble);
//! # Ok::<(), persist::PersistError>(())
//! ```

mod convert;
mod error;
mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use error::PersistError;
pub use schema::{CategoriesSchema, EnsembleSchema, ModelEnvelope, TreeSchema, SCHEMA_VERSION};

use crate::repr::Ensemble;

/// Serialize `ensemble` as pretty-printed JSON.
pub fn to_writer<W: Write>(ensemble: &Ensemble, writer: W) -> Result<(), PersistError> {
    let envelope = ModelEnvelope::new(EnsembleSchema::from(ensemble));
    serde_json::to_writer_pretty(writer, &envelope)?;
    Ok(())
}

/// Deserialize and validate an ensemble.
pub fn from_reader<R: Read>(reader: R) -> Result<Ensemble, PersistError> {
    let envelope: ModelEnvelope = serde_json::from_reader(reader)?;
    from_envelope(envelope)
}

pub fn to_json_string(ensemble: &Ensemble) -> Result<String, PersistError> {
    let envelope = ModelEnvelope::new(EnsembleSchema::from(ensemble));
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn from_json_str(json: &str) -> Result<Ensemble, PersistError> {
    let envelope: ModelEnvelope = serde_json::from_str(json)?;
    from_envelope(envelope)
}

/// Write `ensemble` to `path`, replacing any existing file.
pub fn save_json(ensemble: &Ensemble, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    to_writer(ensemble, &mut writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.as_ref().display(), trees = ensemble.n_trees(), "saved ensemble");
    Ok(())
}

pub fn load_json(path: impl AsRef<Path>) -> Result<Ensemble, PersistError> {
    let ensemble = from_reader(BufReader::new(File::open(path.as_ref())?))?;
    tracing::debug!(path = %path.as_ref().display(), trees = ensemble.n_trees(), "loaded ensemble");
    Ok(ensemble)
}

fn from_envelope(envelope: ModelEnvelope) -> Result<Ensemble, PersistError> {
    if envelope.schema_version != SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    if envelope.model_type != EnsembleSchema::MODEL_TYPE {
        return Err(PersistError::UnexpectedModelType {
            expected: EnsembleSchema::MODEL_TYPE,
            found: envelope.model_type,
        });
    }
    Ensemble::try_from(envelope.model)
}
