//! Configuration for automaton construction and batch scanning.
//!
//! The matching core itself has no tunables: the table layout is fully
//! determined by the pattern set. What can be configured are the guard rails
//! around construction (how many patterns, how long, how much memory the
//! compiled tables may take) and how [`crate::batch`] spreads independent
//! streams across threads.
//!
//! Configurations can be built in code or loaded from YAML/JSON documents.
//! Missing fields fall back to their defaults.

use crate::error::{AcismError, Result};
use serde::{Deserialize, Serialize};

/// Memory limits for compiled automata.
///
/// # Examples
///
/// ```rust
/// use acism::MemoryConfig;
///
/// // Keep compiled tables under 16MB
/// let small = MemoryConfig {
///     max_compiled_memory: 16 * 1024 * 1024,
/// };
/// assert!(small.max_compiled_memory < MemoryConfig::default().max_compiled_memory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum size in bytes of the transition table plus the match-hash
    /// table of a compiled automaton.
    ///
    /// Checked once the table sizes are known and before the tables are
    /// allocated, so an oversized pattern set fails without touching the
    /// allocator for the final tables.
    ///
    /// **Default**: 512MB
    pub max_compiled_memory: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_compiled_memory: 512 * 1024 * 1024, // 512MB
        }
    }
}

/// Limits applied while compiling a pattern set.
///
/// | Preset | Patterns | Pattern length | Compiled memory |
/// |--------|----------|----------------|-----------------|
/// | `default()` | unlimited | unlimited | 512MB |
/// | `constrained()` | 100,000 | 4KB | 64MB |
/// | `unbounded()` | unlimited | unlimited | `usize::MAX` |
///
/// # Examples
///
/// ```rust
/// use acism::CompileConfig;
///
/// let config = CompileConfig::new()
///     .with_max_patterns(10_000)
///     .with_max_pattern_length(256);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Reject pattern sets with more patterns than this.
    pub max_patterns: Option<usize>,
    /// Reject pattern sets containing a pattern longer than this.
    pub max_pattern_length: Option<usize>,
    /// Memory limits for the compiled tables.
    pub memory: MemoryConfig,
}

impl CompileConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for services compiling untrusted pattern lists.
    pub fn constrained() -> Self {
        Self {
            max_patterns: Some(100_000),
            max_pattern_length: Some(4 * 1024),
            memory: MemoryConfig {
                max_compiled_memory: 64 * 1024 * 1024,
            },
        }
    }

    /// Configuration with no limits besides the transition word capacity.
    pub fn unbounded() -> Self {
        Self {
            max_patterns: None,
            max_pattern_length: None,
            memory: MemoryConfig {
                max_compiled_memory: usize::MAX,
            },
        }
    }

    pub fn with_max_patterns(mut self, max: usize) -> Self {
        self.max_patterns = Some(max);
        self
    }

    pub fn with_max_pattern_length(mut self, max: usize) -> Self {
        self.max_pattern_length = Some(max);
        self
    }

    pub fn with_max_compiled_memory(mut self, bytes: usize) -> Self {
        self.memory.max_compiled_memory = bytes;
        self
    }

    /// Parse a configuration from a YAML document.
    ///
    /// ```rust
    /// use acism::CompileConfig;
    ///
    /// let config = CompileConfig::from_yaml_str("max_patterns: 500\n")?;
    /// assert_eq!(config.max_patterns, Some(500));
    /// # Ok::<(), acism::AcismError>(())
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configured limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_patterns == Some(0) {
            return Err(AcismError::InvalidConfig(
                "max_patterns must be greater than 0".to_string(),
            ));
        }
        if self.max_pattern_length == Some(0) {
            return Err(AcismError::InvalidConfig(
                "max_pattern_length must be greater than 0".to_string(),
            ));
        }
        if self.memory.max_compiled_memory == 0 {
            return Err(AcismError::InvalidConfig(
                "max_compiled_memory must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Enforce the pattern count and length limits against a pattern set.
    pub(crate) fn check_patterns<P: AsRef<[u8]>>(&self, patterns: &[P]) -> Result<()> {
        if let Some(max) = self.max_patterns {
            if patterns.len() > max {
                return Err(AcismError::ResourceLimitExceeded(format!(
                    "{} patterns exceeds the limit of {max}",
                    patterns.len()
                )));
            }
        }
        if let Some(max) = self.max_pattern_length {
            if let Some((index, pattern)) = patterns
                .iter()
                .enumerate()
                .find(|(_, p)| p.as_ref().len() > max)
            {
                return Err(AcismError::ResourceLimitExceeded(format!(
                    "pattern {index} is {} bytes long, limit is {max}",
                    pattern.as_ref().len()
                )));
            }
        }
        Ok(())
    }

    /// Enforce the compiled memory limit.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<()> {
        if bytes > self.memory.max_compiled_memory {
            return Err(AcismError::ResourceLimitExceeded(format!(
                "compiled tables need {bytes} bytes, limit is {}",
                self.memory.max_compiled_memory
            )));
        }
        Ok(())
    }
}

/// Configuration for parallel batch scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of threads to use. Zero means the global rayon pool size.
    pub num_threads: usize,
    /// Minimum number of texts before work is spread across threads.
    pub min_batch_size_for_parallelism: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
            min_batch_size_for_parallelism: 64,
        }
    }
}

impl ParallelConfig {
    /// Sequential scanning regardless of batch size.
    pub fn sequential() -> Self {
        Self {
            num_threads: 1,
            min_batch_size_for_parallelism: usize::MAX,
        }
    }

    /// Whether a batch of `len` texts should be scanned in parallel.
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.num_threads != 1 && len >= self.min_batch_size_for_parallelism
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompileConfig::default();
        assert_eq!(config.max_patterns, None);
        assert_eq!(config.max_pattern_length, None);
        assert_eq!(config.memory.max_compiled_memory, 512 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(CompileConfig::constrained().validate().is_ok());
        assert!(CompileConfig::unbounded().validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = CompileConfig::new()
            .with_max_patterns(10)
            .with_max_pattern_length(5)
            .with_max_compiled_memory(1024);
        assert_eq!(config.max_patterns, Some(10));
        assert_eq!(config.max_pattern_length, Some(5));
        assert_eq!(config.memory.max_compiled_memory, 1024);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let configs = [
            CompileConfig::new().with_max_patterns(0),
            CompileConfig::new().with_max_pattern_length(0),
            CompileConfig::new().with_max_compiled_memory(0),
        ];
        for config in configs {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_check_patterns_count() {
        let config = CompileConfig::new().with_max_patterns(2);
        assert!(config.check_patterns(&["a", "b"]).is_ok());
        let err = config.check_patterns(&["a", "b", "c"]).unwrap_err();
        assert!(err.to_string().contains("3 patterns"));
    }

    #[test]
    fn test_check_patterns_length() {
        let config = CompileConfig::new().with_max_pattern_length(3);
        assert!(config.check_patterns(&["abc"]).is_ok());
        let err = config.check_patterns(&["ab", "abcd"]).unwrap_err();
        assert!(err.to_string().contains("pattern 1"));
    }

    #[test]
    fn test_check_memory() {
        let config = CompileConfig::new().with_max_compiled_memory(100);
        assert!(config.check_memory(100).is_ok());
        assert!(config.check_memory(101).is_err());
    }

    #[test]
    fn test_yaml_partial_document_uses_defaults() {
        let config = CompileConfig::from_yaml_str("max_pattern_length: 64\n").unwrap();
        assert_eq!(config.max_pattern_length, Some(64));
        assert_eq!(config.max_patterns, None);
        assert_eq!(config.memory, MemoryConfig::default());
    }

    #[test]
    fn test_json_nested_memory() {
        let config =
            CompileConfig::from_json_str(r#"{"memory": {"max_compiled_memory": 4096}}"#).unwrap();
        assert_eq!(config.memory.max_compiled_memory, 4096);
    }

    #[test]
    fn test_parallel_config() {
        let config = ParallelConfig::default();
        assert!(config.num_threads >= 1);

        let sequential = ParallelConfig::sequential();
        assert!(!sequential.should_parallelize(1_000_000));

        let eager = ParallelConfig {
            num_threads: 4,
            min_batch_size_for_parallelism: 2,
        };
        assert!(!eager.should_parallelize(1));
        assert!(eager.should_parallelize(2));
    }
}
