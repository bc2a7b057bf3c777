/*!
 * Common test utilities for the librovoz test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A Spanish passage long enough for reliable language detection.
/// Kept to ASCII so PDF text extraction reproduces every character.
pub fn spanish_sample_text() -> &'static str {
    "En un lugar de la Mancha de cuyo nombre no quiero acordarme no ha mucho tiempo \
     que vivia un hidalgo de los de lanza en astillero adarga antigua rocin flaco y \
     galgo corredor"
}

/// An English passage long enough for reliable language detection
pub fn english_sample_text() -> &'static str {
    "It is a truth universally acknowledged that a single man in possession of a good \
     fortune must be in want of a wife and the feelings of such a man may be fixed"
}

/// A passage outside the supported language pair, for fallback tests
pub fn german_sample_text() -> &'static str {
    "Der Himmel ist blau und die Sonne scheint hell heute gehen wir zusammen in den \
     Wald und sehen dort viele schoene Baeume und hoeren die Voegel froehlich singen"
}

/// Creates a PDF document with one page per given text
pub fn create_test_pdf(dir: &PathBuf, filename: &str, pages: &[&str]) -> Result<PathBuf> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    // One content stream and page object per page text
    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(filename);
    doc.save(&path)?;
    Ok(path)
}

/// Creates a mono 16-bit PCM WAV file with the given samples
pub fn create_test_wav(dir: &PathBuf, filename: &str, sample_rate: u32, samples: &[i16]) -> Result<PathBuf> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let path = dir.join(filename);
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(path)
}

/// Reads back every sample of a mono 16-bit WAV file
pub fn read_wav_samples(path: &PathBuf) -> Result<(hound::WavSpec, Vec<i16>)> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().collect::<Result<Vec<i16>, _>>()?;
    Ok((spec, samples))
}
