/*!
 * Tests for the page naming and ordering protocol
 */

use librovoz::page_store::{self, PageOrdering, PAGE_MARKER, RESULT_SUFFIX};

/// Test formatting of per-page artifact names
#[test]
fn test_page_file_name_withBaseAndIndex_shouldFormatProtocolName() {
    assert_eq!(page_store::page_file_name("libro", 1, "pdf"), "libro_pagina_1.pdf");
    assert_eq!(page_store::page_file_name("libro", 12, "txt"), "libro_pagina_12.txt");
    assert_eq!(page_store::page_file_name("libro", 3, "wav"), "libro_pagina_3.wav");

    // A base name containing spaces or underscores passes through untouched
    assert_eq!(page_store::page_file_name("mi libro", 3, "txt"), "mi libro_pagina_3.txt");
    assert_eq!(page_store::page_file_name("mi_libro", 3, "txt"), "mi_libro_pagina_3.txt");
}

/// Test formatting of the final audiobook name
#[test]
fn test_result_file_name_shouldAppendResultSuffix() {
    assert_eq!(page_store::result_file_name("libro"), "libro_completo.wav");
    assert_eq!(page_store::result_file_name("mi_libro"), "mi_libro_completo.wav");

    // The protocol constants are what the formatters use
    assert_eq!(PAGE_MARKER, "_pagina_");
    assert_eq!(RESULT_SUFFIX, "_completo");
}

/// Test parsing the page index back out of artifact names
#[test]
fn test_page_index_withProtocolNames_shouldParseTrailingIndex() {
    assert_eq!(page_store::page_index("libro_pagina_7.wav").unwrap(), 7);
    assert_eq!(page_store::page_index("libro_pagina_42.txt").unwrap(), 42);

    // The index is whatever trails the last underscore of the stem,
    // so underscores inside the base name do not confuse the parser
    assert_eq!(page_store::page_index("mi_libro_pagina_12.txt").unwrap(), 12);

    // A stem with no underscore at all is parsed as a bare index
    assert_eq!(page_store::page_index("123.wav").unwrap(), 123);
}

/// Test that names without a numeric tail fail to parse
#[test]
fn test_page_index_withNonNumericTail_shouldFail() {
    assert!(page_store::page_index("libro_pagina_extra.wav").is_err());
    assert!(page_store::page_index("libro.wav").is_err());
    assert!(page_store::page_index("notas_finales.txt").is_err());
    assert!(page_store::page_index("libro_pagina_.txt").is_err());
}

/// Test round-tripping an index through format and parse
#[test]
fn test_page_index_afterFormatting_shouldRoundTrip() {
    for index in [1, 2, 9, 10, 42, 100] {
        let name = page_store::page_file_name("el quijote", index, "wav");
        assert_eq!(page_store::page_index(&name).unwrap(), index);
    }
}

/// Test numeric sorting of conforming page file names
#[test]
fn test_sort_page_files_withNumericIndices_shouldOrderByIndex() {
    let mut files = vec![
        "libro_pagina_10.wav".to_string(),
        "libro_pagina_2.wav".to_string(),
        "libro_pagina_1.wav".to_string(),
    ];

    let ordering = page_store::sort_page_files(&mut files);

    // Numeric order puts page 2 before page 10, where a lexical sort would not
    assert_eq!(ordering, PageOrdering::ByIndex);
    assert_eq!(
        files,
        vec![
            "libro_pagina_1.wav".to_string(),
            "libro_pagina_2.wav".to_string(),
            "libro_pagina_10.wav".to_string(),
        ]
    );
}

/// Test the lexical fallback when any name does not conform
#[test]
fn test_sort_page_files_withNonConformingName_shouldFallBackToLexical() {
    let mut files = vec![
        "libro_pagina_10.wav".to_string(),
        "intro.wav".to_string(),
        "libro_pagina_2.wav".to_string(),
    ];

    let ordering = page_store::sort_page_files(&mut files);

    // One bad name sends the entire list through a plain lexical sort
    assert_eq!(ordering, PageOrdering::Lexical);
    assert_eq!(
        files,
        vec![
            "intro.wav".to_string(),
            "libro_pagina_10.wav".to_string(),
            "libro_pagina_2.wav".to_string(),
        ]
    );
}

/// Test sorting of an empty list
#[test]
fn test_sort_page_files_withEmptyList_shouldReportIndexOrder() {
    let mut files: Vec<String> = Vec::new();
    assert_eq!(page_store::sort_page_files(&mut files), PageOrdering::ByIndex);
    assert!(files.is_empty());
}

/// Test sorting a list that is already in document order
#[test]
fn test_sort_page_files_withSortedInput_shouldKeepOrder() {
    let mut files = vec![
        "libro_pagina_1.txt".to_string(),
        "libro_pagina_2.txt".to_string(),
        "libro_pagina_3.txt".to_string(),
    ];
    let before = files.clone();

    let ordering = page_store::sort_page_files(&mut files);

    assert_eq!(ordering, PageOrdering::ByIndex);
    assert_eq!(files, before);
}
