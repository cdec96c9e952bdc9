//! Byte-level persistence of fitted parameters (feature `serde`).
//!
//! Fitted models expose their state as plain data ([`Coefficients`],
//! [`StandardScalerParams`]) that holds no backend tensors, so a model
//! trained on one backend can be reloaded on another. Encoding is `bincode`;
//! failures surface as [`LogRegError::Serialization`] or [`LogRegError::Io`].
//!
//! [`Coefficients`]: crate::model::logistic::Coefficients
//! [`StandardScalerParams`]: crate::preprocessing::StandardScalerParams
//! [`LogRegError::Serialization`]: crate::LogRegError::Serialization
//! [`LogRegError::Io`]: crate::LogRegError::Io

use std::fs;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::model::logistic::Coefficients;
use crate::preprocessing::StandardScalerParams;

/// Fitted parameter sets that can be written to and read back from bytes or
/// files.
pub trait SerializableParams: Serialize + DeserializeOwned {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), &bytes)?;
        debug!("wrote {} bytes to {}", bytes.len(), path.as_ref().display());
        Ok(())
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}

impl SerializableParams for Coefficients {}

impl SerializableParams for StandardScalerParams {}
