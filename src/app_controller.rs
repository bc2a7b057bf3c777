use anyhow::{Result, Context, anyhow};
use log::{warn, info, debug};
use std::path::{Path, PathBuf};
use crate::app_config::{Config, TranslationMode};
use crate::audio_processor::{ensure_wav_extension, AudioClip, AudioConcatenator};
use crate::document_processor::DocumentSplitter;
use crate::file_utils::FileManager;
use crate::language_utils::{self, SupportedLanguage};
use crate::page_store;
use crate::providers::{SpeechSynthesizer, Translator};
use crate::providers::mms::MmsClient;
use crate::providers::nllb::NllbClient;
use indicatif::{ProgressBar, ProgressStyle, MultiProgress};
use std::io::Write;
use std::sync::Arc;

// @module: Application controller for the document to audiobook pipeline

/// Outcome of the one-time translation decision
///
/// Computed from the first page in sorted order and applied to every page
/// of the run, no matter what the later pages turn out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationDecision {
    /// Keep every page in its source language
    Skip,
    /// Translate every page into this language
    Translate(SupportedLanguage),
}

/// Main application controller for audiobook conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation provider
    translator: Arc<dyn Translator>,
    // @field: Spanish synthesis voice
    spanish_voice: Arc<dyn SpeechSynthesizer>,
    // @field: English synthesis voice
    english_voice: Arc<dyn SpeechSynthesizer>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let translation = &config.translation;
        let translator = NllbClient::with_config(
            &translation.endpoint,
            &translation.model,
            translation.timeout_secs,
            translation.retry_count,
            translation.retry_backoff_ms,
            translation.rate_limit,
        )?;

        let tts = &config.tts;
        let spanish_voice = MmsClient::with_config(
            &tts.endpoint,
            tts.voice_for(SupportedLanguage::Es),
            SupportedLanguage::Es,
            tts.timeout_secs,
            tts.retry_count,
            tts.retry_backoff_ms,
        )?;
        let english_voice = MmsClient::with_config(
            &tts.endpoint,
            tts.voice_for(SupportedLanguage::En),
            SupportedLanguage::En,
            tts.timeout_secs,
            tts.retry_count,
            tts.retry_backoff_ms,
        )?;

        Ok(Self {
            config,
            translator: Arc::new(translator),
            spanish_voice: Arc::new(spanish_voice),
            english_voice: Arc::new(english_voice),
        })
    }

    /// Create a controller over externally built providers
    pub fn with_providers(
        config: Config,
        translator: Arc<dyn Translator>,
        spanish_voice: Arc<dyn SpeechSynthesizer>,
        english_voice: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            translator,
            spanish_voice,
            english_voice,
        }
    }

    /// Run the main workflow for one source document
    pub async fn run(&self, source: PathBuf, base_name: Option<String>) -> Result<PathBuf> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(source, base_name, &multi_progress).await
    }

    /// Run the full pipeline with progress reporting
    async fn run_with_progress(&self, source: PathBuf, base_name: Option<String>, multi_progress: &MultiProgress) -> Result<PathBuf> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        // Check if the input file exists and really is a PDF document
        if !source.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", source));
        }
        if !FileManager::is_pdf(&source)? {
            return Err(anyhow!("Input file is not a PDF document: {:?}", source));
        }

        // Ensure the whole directory layout exists before any stage runs
        for dir in self.config.directories.all() {
            FileManager::ensure_dir(dir)?;
        }

        // Probe the synthesis voices in the background. A dead service fails
        // the synthesis stage anyway, the probe only surfaces it earlier.
        self.probe_voices();

        let splitter = match base_name {
            Some(base) => DocumentSplitter::new(&source, base),
            None => DocumentSplitter::from_path(&source)?,
        };
        info!("🚀 Processing {:?} as '{}'", source, splitter.base_name());

        // Stage 1 and 2: split into per-page documents, then extract text
        let page_files = splitter.split_into_pages(&self.config.directories.pages)?;
        DocumentSplitter::extract_pages_text(&self.config.directories.pages, &self.config.directories.text)?;

        // Stage 3: one decision for the whole run, from the first page
        let decision = self.decide_translation()?;

        // Stage 4: translate page texts in place, or leave them alone
        let translated = self.translate_pages(decision, multi_progress).await?;

        // Stage 5: one WAV per page, routed by the page's own language
        let synthesized = self.synthesize_pages(multi_progress).await?;

        // Stage 6: join the page WAVs into the final audiobook
        let concatenator = AudioConcatenator::new(
            &self.config.directories.audio,
            &self.config.directories.results,
        );
        let output_path = concatenator.concatenate(&page_store::result_file_name(splitter.base_name()))?;

        let elapsed = start_time.elapsed();
        info!("Audiobook ready: {}", output_path.display());
        info!(
            "Pages: {} split, {} translated, {} synthesized - Total: {}",
            page_files.len(),
            translated,
            synthesized,
            Self::format_duration(elapsed)
        );

        Ok(output_path)
    }

    /// Decide once whether this run translates, from the first page in sorted order
    fn decide_translation(&self) -> Result<TranslationDecision> {
        if self.config.translation.mode == TranslationMode::Never {
            info!("Translation disabled, keeping the source text");
            return Ok(TranslationDecision::Skip);
        }

        let text_dir = &self.config.directories.text;
        let mut names = Self::page_file_names(text_dir, "txt")?;
        if names.is_empty() {
            warn!("No page text found in {:?}, nothing to translate", text_dir);
            return Ok(TranslationDecision::Skip);
        }
        page_store::sort_page_files(&mut names);

        let first_page = FileManager::read_to_string(text_dir.join(&names[0]))?;
        let detected = language_utils::detect_language(&first_page);
        let source = match detected.as_deref().and_then(SupportedLanguage::from_tag) {
            Some(language) => language,
            None => {
                info!(
                    "First page language '{}' has no translation pair, keeping the source text",
                    detected.as_deref().unwrap_or("unknown")
                );
                return Ok(TranslationDecision::Skip);
            }
        };

        let target = source.other();
        let decision = match self.config.translation.mode {
            TranslationMode::Never => TranslationDecision::Skip,
            TranslationMode::Always => TranslationDecision::Translate(target),
            TranslationMode::Ask => {
                if Self::confirm_translation(source, target)? {
                    TranslationDecision::Translate(target)
                } else {
                    TranslationDecision::Skip
                }
            }
        };

        match decision {
            TranslationDecision::Skip => {
                info!("Keeping {} text for the whole document", source.name());
            }
            TranslationDecision::Translate(target) => {
                info!("Translating the whole document from {} to {}", source.name(), target.name());
            }
        }

        Ok(decision)
    }

    // @fn: One y/n question on stdin, default no
    fn confirm_translation(source: SupportedLanguage, target: SupportedLanguage) -> Result<bool> {
        print!(
            "Detected {} text. Translate the whole document to {}? [y/N] ",
            source.name(),
            target.name()
        );
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"))
    }

    /// Translate every page text in place, honoring the run-wide decision
    ///
    /// A page whose own language cannot be handled keeps its source text and
    /// the run continues. Anything else that goes wrong is fatal.
    async fn translate_pages(&self, decision: TranslationDecision, multi_progress: &MultiProgress) -> Result<usize> {
        let target = match decision {
            TranslationDecision::Skip => return Ok(0),
            TranslationDecision::Translate(target) => target,
        };

        self.translator.test_connection().await.with_context(|| {
            format!("Translation service is unreachable at {}", self.config.translation.endpoint)
        })?;

        let text_dir = &self.config.directories.text;
        let mut names = Self::page_file_names(text_dir, "txt")?;
        page_store::sort_page_files(&mut names);

        // Create a progress bar for translation tracking
        let progress_bar = multi_progress.add(ProgressBar::new(names.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        info!(
            "🚀 Translating {} pages to {} with {}",
            names.len(),
            target.name(),
            self.config.translation.model
        );

        let mut translated = 0;
        let mut kept: Vec<String> = Vec::new();
        for name in &names {
            let path = text_dir.join(name);
            let text = FileManager::read_to_string(&path)?;

            match self.translator.translate(&text, target).await {
                Ok(translation) => {
                    FileManager::write_to_file(&path, &translation)?;
                    translated += 1;
                }
                Err(e) if e.is_page_recoverable() => {
                    warn!("Keeping source text for {}: {}", name, e);
                    kept.push(name.clone());
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to translate {}", name));
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        if kept.is_empty() {
            info!("Successfully translated all {} pages", translated);
        } else {
            warn!(
                "Translated {} pages, {} kept their source text: {}",
                translated,
                kept.len(),
                kept.join(", ")
            );
        }

        Ok(translated)
    }

    /// Synthesize one WAV per page, routing each page by its own language
    async fn synthesize_pages(&self, multi_progress: &MultiProgress) -> Result<usize> {
        let text_dir = &self.config.directories.text;
        let audio_dir = &self.config.directories.audio;

        let mut names = Self::page_file_names(text_dir, "txt")?;
        if names.is_empty() {
            return Err(anyhow!("No page text found in {:?}", text_dir));
        }
        page_store::sort_page_files(&mut names);

        // Create a progress bar for synthesis tracking
        let progress_bar = multi_progress.add(ProgressBar::new(names.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Synthesizing");

        info!("🔊 Synthesizing {} pages", names.len());

        let mut synthesized = 0;
        for name in &names {
            let text = FileManager::read_to_string(text_dir.join(name))?;

            // Route each page by what it actually contains, not by the
            // run-wide decision. Pages outside the supported pair get the
            // Spanish voice instead of failing the run.
            let detected = language_utils::detect_language(&text);
            let language = match detected.as_deref().and_then(SupportedLanguage::from_tag) {
                Some(language) => language,
                None => {
                    warn!(
                        "Page {} detected as '{}' which has no voice, using the Spanish voice",
                        name,
                        detected.as_deref().unwrap_or("unknown")
                    );
                    SupportedLanguage::Es
                }
            };
            let voice = match language {
                SupportedLanguage::Es => &self.spanish_voice,
                SupportedLanguage::En => &self.english_voice,
            };

            let result = voice
                .synthesize(&text)
                .await
                .with_context(|| format!("Failed to synthesize {}", name))?;
            let clip = AudioClip::from_float_samples(&result.samples, result.sample_rate);

            let stem = Path::new(name).file_stem().and_then(|s| s.to_str()).unwrap_or(name);
            let wav_path = audio_dir.join(ensure_wav_extension(stem));
            clip.write_wav(&wav_path)
                .with_context(|| format!("Failed to write {}", wav_path.display()))?;

            debug!(
                "Wrote {} ({:.1}s, {} voice)",
                wav_path.display(),
                clip.duration_secs(),
                language.name()
            );
            synthesized += 1;
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        info!("Synthesized {} pages of audio", synthesized);

        Ok(synthesized)
    }

    // @fn: Probe both voices in the background, failures only warn here
    fn probe_voices(&self) {
        for voice in [&self.spanish_voice, &self.english_voice] {
            let voice = Arc::clone(voice);
            tokio::spawn(async move {
                if let Err(e) = voice.test_connection().await {
                    warn!("{} synthesis service check failed: {}", voice.language().name(), e);
                }
            });
        }
    }

    // @fn: File names with the given extension inside a directory
    fn page_file_names(dir: &Path, extension: &str) -> Result<Vec<String>> {
        let names = FileManager::find_files(dir, extension)?
            .into_iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        Ok(names)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
