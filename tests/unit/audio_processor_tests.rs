/*!
 * Tests for audio clip handling and page concatenation
 */

use anyhow::Result;
use hound::SampleFormat;
use librovoz::audio_processor::{ensure_wav_extension, AudioClip, AudioConcatenator};
use librovoz::errors::AudioError;
use librovoz::page_store;
use crate::common;

/// Test conversion of float samples into 16-bit PCM
#[test]
fn test_from_float_samples_shouldScaleToPcmRange() {
    let clip = AudioClip::from_float_samples(&[0.0, 0.5, -0.5, 1.0, -1.0], 16_000);

    assert_eq!(clip.samples, vec![0, 16383, -16383, 32767, -32767]);
    assert_eq!(clip.sample_rate, 16_000);
}

/// Test the duration computation of a clip
#[test]
fn test_duration_secs_shouldDivideByRate() {
    let one_second = AudioClip { samples: vec![0; 16_000], sample_rate: 16_000 };
    let half_second = AudioClip { samples: vec![0; 8_000], sample_rate: 16_000 };

    assert_eq!(one_second.duration_secs(), 1.0);
    assert_eq!(half_second.duration_secs(), 0.5);
}

/// Test the WAV format every artifact is written in
#[test]
fn test_spec_shouldDescribeMono16BitPcm() {
    let clip = AudioClip::from_float_samples(&[0.1, 0.2], 22_050);
    let spec = clip.spec();

    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 22_050);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, SampleFormat::Int);
}

/// Test writing a clip and reading it back
#[test]
fn test_write_wav_thenRead_shouldPreserveSamples() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("clip.wav");

    let clip = AudioClip { samples: vec![100, -200, 300, -400], sample_rate: 16_000 };
    clip.write_wav(&path)?;

    let (spec, samples) = common::read_wav_samples(&path)?;
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.channels, 1);
    assert_eq!(samples, clip.samples);

    Ok(())
}

/// Test the wav extension helper
#[test]
fn test_ensure_wav_extension_withVariousNames_shouldNormalizeSuffix() {
    assert_eq!(ensure_wav_extension("libro_pagina_1"), "libro_pagina_1.wav");
    assert_eq!(ensure_wav_extension("libro_pagina_1.wav"), "libro_pagina_1.wav");

    // Case-insensitive suffix check
    assert_eq!(ensure_wav_extension("LIBRO.WAV"), "LIBRO.WAV");

    // A different extension gets the suffix appended, not replaced
    assert_eq!(ensure_wav_extension("book.mp3"), "book.mp3.wav");
}

/// Test concatenation joins page files in document order
#[test]
fn test_concatenate_withNumberedPages_shouldJoinInDocumentOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("audio");
    let output_dir = temp_dir.path().join("result");
    std::fs::create_dir_all(&input_dir)?;

    // Create the files out of order, with a distinct value per page so the
    // join order is visible in the output samples. Page 10 before page 2
    // would betray a lexical sort.
    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_10.wav", 16_000, &[300; 4])?;
    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_1.wav", 16_000, &[100; 4])?;
    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_2.wav", 16_000, &[200; 4])?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let output = concatenator.concatenate(&page_store::result_file_name("libro"))?;

    assert_eq!(output.file_name().and_then(|n| n.to_str()), Some("libro_completo.wav"));

    let (spec, samples) = common::read_wav_samples(&output)?;
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(samples.len(), 12);
    assert_eq!(&samples[0..4], &[100; 4]);
    assert_eq!(&samples[4..8], &[200; 4]);
    assert_eq!(&samples[8..12], &[300; 4]);

    Ok(())
}

/// Test the lexical fallback order when names do not conform
#[test]
fn test_concatenate_withNonConformingNames_shouldFallBackToLexicalOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().to_path_buf();
    let output_dir = temp_dir.path().join("result");

    common::create_test_wav(&input_dir, "beta.wav", 16_000, &[2; 3])?;
    common::create_test_wav(&input_dir, "alpha.wav", 16_000, &[1; 3])?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let output = concatenator.concatenate("joined.wav")?;

    let (_, samples) = common::read_wav_samples(&output)?;
    assert_eq!(samples, vec![1, 1, 1, 2, 2, 2]);

    Ok(())
}

/// Test that a sample rate mismatch aborts the join
#[test]
fn test_concatenate_withMismatchedSampleRate_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().to_path_buf();
    let output_dir = temp_dir.path().join("result");

    common::create_test_wav(&input_dir, "libro_pagina_1.wav", 16_000, &[100; 4])?;
    common::create_test_wav(&input_dir, "libro_pagina_2.wav", 22_050, &[200; 4])?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let result = concatenator.concatenate("libro_completo.wav");

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AudioError>(),
        Some(AudioError::FormatMismatch { .. })
    ));

    Ok(())
}

/// Test that an empty input directory is an error, not an empty file
#[test]
fn test_concatenate_withNoPageAudio_shouldFailWithNoInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("audio");
    let output_dir = temp_dir.path().join("result");
    std::fs::create_dir_all(&input_dir)?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let result = concatenator.concatenate("libro_completo.wav");

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err.downcast_ref::<AudioError>(), Some(AudioError::NoInput(_))));

    Ok(())
}

/// Test that a result directory nested inside the input directory is ignored
#[test]
fn test_concatenate_withNestedResultDir_shouldIgnoreSubdirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("audio");
    let output_dir = input_dir.join("result_audio");
    std::fs::create_dir_all(&output_dir)?;

    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_1.wav", 16_000, &[7; 5])?;
    // A previous run's output living below the input directory must not be joined
    common::create_test_wav(&output_dir.to_path_buf(), "libro_completo.wav", 16_000, &[9; 50])?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let output = concatenator.concatenate("libro_completo.wav")?;

    let (_, samples) = common::read_wav_samples(&output)?;
    assert_eq!(samples, vec![7; 5]);

    Ok(())
}

/// Test that a rerun overwrites the previous result file
#[test]
fn test_concatenate_rerun_shouldOverwritePreviousResult() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("audio");
    let output_dir = temp_dir.path().join("result");
    std::fs::create_dir_all(&input_dir)?;

    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_1.wav", 16_000, &[1; 4])?;

    let concatenator = AudioConcatenator::new(&input_dir, &output_dir);
    let first = concatenator.concatenate("libro_completo.wav")?;
    let (_, first_samples) = common::read_wav_samples(&first)?;
    assert_eq!(first_samples, vec![1; 4]);

    // Replace the page audio and join again under the identical name
    common::create_test_wav(&input_dir.to_path_buf(), "libro_pagina_1.wav", 16_000, &[5; 6])?;
    let second = concatenator.concatenate("libro_completo.wav")?;

    assert_eq!(first, second);
    let (_, second_samples) = common::read_wav_samples(&second)?;
    assert_eq!(second_samples, vec![5; 6]);

    Ok(())
}
