//! Crate-level test doubles and behaviour tests.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use mockall::mock;
use tracing::{Dispatch, Level};
use tracing_subscriber::fmt::MakeWriter;
use trellis_plugins::{
    PluginDescriptor, PluginError, PluginExecutor, PropertyMap, ValidationEntryPoint,
    ValidationError, ValidationRequest, ValidationResult,
};

use crate::command::{ProfileCommand, Username};
use crate::commit::{CommitError, CommitReceipt, ConfigCommitter};
use crate::profile::{ConfigurationProperty, ElasticProfile};
use crate::secret::{Cipher, CipherError};


mock! {
    pub EntryPoint {}

    impl ValidationEntryPoint for EntryPoint {
        fn validate(
            &self,
            plugin_id: &str,
            properties: &PropertyMap,
        ) -> Result<ValidationResult, PluginError>;
    }
}

mock! {
    pub Committer {}

    impl ConfigCommitter<ElasticProfile> for Committer {
        fn commit(
            &self,
            command: &ProfileCommand<ElasticProfile>,
            actor: &Username,
        ) -> Result<CommitReceipt, CommitError>;
    }
}

/// "Decrypts" by reversing the cipher text; one sentinel value fails.
pub(crate) struct ReversingCipher;

impl ReversingCipher {
    pub(crate) const UNDECRYPTABLE: &'static str = "!in-transit!";
}

impl Cipher for ReversingCipher {
    fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError> {
        if cipher_text == Self::UNDECRYPTABLE {
            return Err(CipherError::new("key material not yet available"));
        }
        Ok(cipher_text.chars().rev().collect())
    }
}

/// Reports an error unless `Image` is present and non-blank.
pub(crate) struct RequiresImage;

impl PluginExecutor for RequiresImage {
    fn validate(
        &self,
        _descriptor: &PluginDescriptor,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, PluginError> {
        let present = request
            .properties()
            .get("Image")
            .is_some_and(|value| !value.trim().is_empty());
        if present {
            return Ok(ValidationResult::success());
        }
        Ok(ValidationResult::with_errors(vec![ValidationError::new(
            "Image",
            "Image must not be blank.",
        )]))
    }
}

/// An elastic profile with a single `Image` property.
pub(crate) fn elastic_profile(id: &str, cluster_profile_id: Option<&str>) -> ElasticProfile {
    ElasticProfile::new(id, cluster_profile_id)
        .with_property(ConfigurationProperty::plain("Image", "alpine"))
}

/// Collects formatted log output from a dedicated dispatch.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub(crate) fn dispatch(&self) -> Dispatch {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .finish();
        Dispatch::new(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Number of lines logged at `level`.
    pub(crate) fn count(&self, level: Level) -> usize {
        let marker = level.as_str();
        self.contents()
            .lines()
            .filter(|line| line.split_whitespace().nth(1) == Some(marker))
            .count()
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

pub(crate) struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
