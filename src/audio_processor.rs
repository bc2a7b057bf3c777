use std::path::{Path, PathBuf};
use anyhow::Result;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, info};

use crate::errors::AudioError;
use crate::file_utils::FileManager;
use crate::page_store;

// @module: Page audio reading, writing and joining

// @struct: One clip of mono 16-bit PCM audio
#[derive(Debug, Clone)]
pub struct AudioClip {
    // @field: PCM samples
    pub samples: Vec<i16>,
    // @field: Samples per second
    pub sample_rate: u32,
}

impl AudioClip {
    // @fn: Convert float samples from a synthesis engine into 16-bit PCM
    pub fn from_float_samples(samples: &[f32], sample_rate: u32) -> Self {
        let samples = samples.iter().map(|&s| (s * 32767.0) as i16).collect();
        AudioClip { samples, sample_rate }
    }

    // @fn: Duration of the clip in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    // @fn: WAV format of every artifact this pipeline writes
    pub fn spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    // @fn: Write the clip to a WAV file
    pub fn write_wav<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioError> {
        let path = path.as_ref();
        let write_err = |e: hound::Error| AudioError::WriteFailed {
            file: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut writer = WavWriter::create(path, self.spec()).map_err(write_err)?;
        for &sample in &self.samples {
            writer.write_sample(sample).map_err(write_err)?;
        }
        writer.finalize().map_err(write_err)?;

        Ok(())
    }
}

// @fn: Append ".wav" to a file name that lacks it
pub fn ensure_wav_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(".wav") {
        name.to_string()
    } else {
        format!("{}.wav", name)
    }
}

// @fn: Human-readable WAV format for error messages
fn format_spec(spec: &WavSpec) -> String {
    let format = match spec.sample_format {
        SampleFormat::Int => "int",
        SampleFormat::Float => "float",
    };
    format!("{}ch {}Hz {}-bit {}", spec.channels, spec.sample_rate, spec.bits_per_sample, format)
}

// @fn: Read a whole WAV file as 16-bit samples plus its format
fn read_wav_file(path: &Path) -> Result<(WavSpec, Vec<i16>), AudioError> {
    let read_err = |e: hound::Error| AudioError::ReadFailed {
        file: path.display().to_string(),
        reason: e.to_string(),
    };

    let reader = WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<i16>, _>>()
        .map_err(read_err)?;

    Ok((spec, samples))
}

// @struct: Joins per-page WAV files into the final audiobook file
pub struct AudioConcatenator {
    // @field: Directory holding the per-page WAV files
    input_dir: PathBuf,
    // @field: Directory the joined file is written into
    output_dir: PathBuf,
}

impl AudioConcatenator {
    // @fn: Create a concatenator over an input and output directory
    pub fn new<P1: AsRef<Path>, P2: AsRef<Path>>(input_dir: P1, output_dir: P2) -> Self {
        AudioConcatenator {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    // @fn: Join every page WAV in document order into one file
    //
    // All inputs must share one WAV format; a mismatch aborts the join
    // rather than silently resampling.
    pub fn concatenate(&self, output_name: &str) -> Result<PathBuf> {
        let mut names: Vec<String> = FileManager::find_files(&self.input_dir, "wav")?
            .into_iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();

        if names.is_empty() {
            return Err(AudioError::NoInput(self.input_dir.display().to_string()).into());
        }

        let ordering = page_store::sort_page_files(&mut names);
        debug!("Joining {} page files ({:?} order)", names.len(), ordering);

        let mut expected: Option<WavSpec> = None;
        let mut joined: Vec<i16> = Vec::new();
        for name in &names {
            let path = self.input_dir.join(name);
            let (spec, mut samples) = read_wav_file(&path)?;

            match expected {
                None => expected = Some(spec),
                Some(reference) if reference != spec => {
                    return Err(AudioError::FormatMismatch {
                        expected: format_spec(&reference),
                        found: format_spec(&spec),
                        file: path.display().to_string(),
                    }
                    .into());
                }
                Some(_) => {}
            }

            joined.append(&mut samples);
        }

        let spec = expected.ok_or_else(|| AudioError::NoInput(self.input_dir.display().to_string()))?;

        FileManager::ensure_dir(&self.output_dir)?;
        let output_path = self.output_dir.join(ensure_wav_extension(output_name));
        let write_err = |e: hound::Error| AudioError::WriteFailed {
            file: output_path.display().to_string(),
            reason: e.to_string(),
        };

        let mut writer = WavWriter::create(&output_path, spec).map_err(write_err)?;
        for &sample in &joined {
            writer.write_sample(sample).map_err(write_err)?;
        }
        writer.finalize().map_err(write_err)?;

        let seconds = joined.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);
        info!("Joined {} page files into {} ({:.1}s of audio)", names.len(), output_path.display(), seconds);

        Ok(output_path)
    }
}
