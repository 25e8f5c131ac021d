//! Generation request types: parameters, validation, tag prompt building.

use serde::{Deserialize, Serialize};

/// Lower bound for the requested audio length (the UI slider starts at 1 s).
pub const MIN_AUDIO_LENGTH_MS: u64 = 1_000;

/// Upper bound for the requested audio length (the UI slider ends at 240 s).
pub const MAX_AUDIO_LENGTH_MS: u64 = 240_000;

/// Sentinel seed value meaning "pick a random seed".
pub const RANDOM_SEED: i64 = -1;

/// Parameters for a single generation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationParams {
    /// Comma-joined style tags (see [`TagPrompt`]).
    pub tags: String,
    /// Lyrics with optional section markers (`[Verse]`, `[Chorus]`, ...).
    pub lyrics: String,
    /// Requested audio length in milliseconds.
    pub max_audio_length_ms: u64,
    /// Top-K sampling cutoff.
    pub topk: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Classifier-free-guidance scale.
    pub cfg_scale: f64,
    /// Seed, or [`RANDOM_SEED`] to pick one at dispatch time.
    pub seed: i64,
    /// Output filename stem (no extension).
    pub filename: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            tags: String::new(),
            lyrics: String::new(),
            max_audio_length_ms: 30_000,
            topk: 50,
            temperature: 1.0,
            cfg_scale: 1.5,
            seed: RANDOM_SEED,
            filename: "output".to_string(),
        }
    }
}

/// Parameter validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamsError {
    #[error("Audio length must be between 1000 and 240000 ms, got {0}")]
    InvalidAudioLength(u64),

    #[error("Top-K must be between 1 and 100, got {0}")]
    InvalidTopK(u32),

    #[error("Temperature must be positive, got {0}")]
    InvalidTemperature(f64),

    #[error("CFG scale must be >= 1.0, got {0}")]
    InvalidCfgScale(f64),

    #[error("Please select at least one tag")]
    EmptyTags,

    #[error("Please enter lyrics")]
    EmptyLyrics,

    #[error("Output filename cannot be empty")]
    EmptyFilename,
}

/// Validate generation parameters before dispatching to the engine.
pub fn validate_params(params: &GenerationParams) -> Result<(), ParamsError> {
    if !(MIN_AUDIO_LENGTH_MS..=MAX_AUDIO_LENGTH_MS).contains(&params.max_audio_length_ms) {
        return Err(ParamsError::InvalidAudioLength(params.max_audio_length_ms));
    }
    if !(1..=100).contains(&params.topk) {
        return Err(ParamsError::InvalidTopK(params.topk));
    }
    if params.temperature <= 0.0 {
        return Err(ParamsError::InvalidTemperature(params.temperature));
    }
    if params.cfg_scale < 1.0 {
        return Err(ParamsError::InvalidCfgScale(params.cfg_scale));
    }
    if params.tags.trim().is_empty() {
        return Err(ParamsError::EmptyTags);
    }
    if params.lyrics.trim().is_empty() {
        return Err(ParamsError::EmptyLyrics);
    }
    if params.filename.trim().is_empty() {
        return Err(ParamsError::EmptyFilename);
    }
    Ok(())
}

/// Resolve a seed: [`RANDOM_SEED`] draws uniformly from `0..=i32::MAX`,
/// anything else passes through unchanged.
#[must_use]
pub fn resolve_seed(seed: i64) -> i64 {
    if seed == RANDOM_SEED {
        use rand::Rng;
        rand::thread_rng().gen_range(0..=i64::from(i32::MAX))
    } else {
        seed
    }
}

/// Structured tag prompt builder.
///
/// The four primary selections always come first, followed by any free-form
/// custom tags. The result is the comma-joined string the engine expects,
/// e.g. `"pop,female vocal,energetic,medium,piano"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPrompt {
    pub genre: String,
    pub vocal: String,
    pub mood: String,
    pub tempo: String,
    /// Comma-separated free-form tags; trimmed and lowercased on build.
    pub custom: String,
}

impl Default for TagPrompt {
    fn default() -> Self {
        Self {
            genre: "pop".to_string(),
            vocal: "female vocal".to_string(),
            mood: "energetic".to_string(),
            tempo: "medium".to_string(),
            custom: String::new(),
        }
    }
}

impl TagPrompt {
    /// Build the comma-joined tag string (no spaces around commas).
    #[must_use]
    pub fn build(&self) -> String {
        let mut tags = vec![
            self.genre.clone(),
            self.vocal.clone(),
            self.mood.clone(),
            self.tempo.clone(),
        ];
        for tag in self.custom.split(',') {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
        tags.join(",")
    }
}

/// Ordered queue of pending batch generations.
///
/// Plain bookkeeping - the sequential processing itself lives in
/// `GenerationService::run_batch`.
#[derive(Debug, Clone, Default)]
pub struct BatchQueue {
    items: Vec<GenerationParams>,
}

impl BatchQueue {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item, returning its 1-based queue position.
    pub fn add(&mut self, params: GenerationParams) -> usize {
        self.items.push(params);
        self.items.len()
    }

    /// Remove the item at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<GenerationParams> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[GenerationParams] {
        &self.items
    }

    /// Take every queued item, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<GenerationParams> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> GenerationParams {
        GenerationParams {
            tags: "pop,female vocal,energetic,medium".to_string(),
            lyrics: "[Verse]\nla la la".to_string(),
            ..GenerationParams::default()
        }
    }

    #[test]
    fn test_valid_params_pass() {
        assert!(validate_params(&valid_params()).is_ok());
    }

    #[test]
    fn test_audio_length_bounds() {
        let mut params = valid_params();
        params.max_audio_length_ms = 500;
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::InvalidAudioLength(500))
        ));

        params.max_audio_length_ms = 300_000;
        assert!(validate_params(&params).is_err());

        params.max_audio_length_ms = MAX_AUDIO_LENGTH_MS;
        assert!(validate_params(&params).is_ok());
    }

    #[test]
    fn test_topk_bounds() {
        let mut params = valid_params();
        params.topk = 0;
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::InvalidTopK(0))
        ));
        params.topk = 101;
        assert!(validate_params(&params).is_err());
    }

    #[test]
    fn test_temperature_and_cfg() {
        let mut params = valid_params();
        params.temperature = 0.0;
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::InvalidTemperature(_))
        ));

        params.temperature = 1.0;
        params.cfg_scale = 0.9;
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::InvalidCfgScale(_))
        ));
    }

    #[test]
    fn test_empty_tags_and_lyrics() {
        let mut params = valid_params();
        params.tags = "  ".to_string();
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::EmptyTags)
        ));

        params.tags = "pop".to_string();
        params.lyrics = String::new();
        assert!(matches!(
            validate_params(&params),
            Err(ParamsError::EmptyLyrics)
        ));
    }

    #[test]
    fn test_resolve_seed_passthrough() {
        assert_eq!(resolve_seed(42), 42);
        assert_eq!(resolve_seed(0), 0);
    }

    #[test]
    fn test_resolve_seed_random_in_range() {
        for _ in 0..100 {
            let seed = resolve_seed(RANDOM_SEED);
            assert!((0..=i64::from(i32::MAX)).contains(&seed));
        }
    }

    #[test]
    fn test_tag_prompt_defaults() {
        let prompt = TagPrompt::default();
        assert_eq!(prompt.build(), "pop,female vocal,energetic,medium");
    }

    #[test]
    fn test_tag_prompt_custom_tags_normalized() {
        let prompt = TagPrompt {
            custom: " Piano , GUITAR ,, synth ".to_string(),
            ..TagPrompt::default()
        };
        assert_eq!(
            prompt.build(),
            "pop,female vocal,energetic,medium,piano,guitar,synth"
        );
    }

    #[test]
    fn test_batch_queue_bookkeeping() {
        let mut queue = BatchQueue::new();
        assert!(queue.is_empty());

        let pos = queue.add(valid_params());
        assert_eq!(pos, 1);
        assert_eq!(queue.add(valid_params()), 2);

        assert!(queue.remove(5).is_none());
        assert!(queue.remove(0).is_some());
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
    }
}
