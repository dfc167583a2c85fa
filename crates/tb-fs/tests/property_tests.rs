use proptest::prelude::*;
use tb_fs::NormalizedPath;

proptest! {
    #[test]
    fn test_normalized_paths_never_contain_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_file_name_of_join_is_last_segment(
        base in "/[a-z]{1,8}(/[a-z0-9]{1,8}){0,3}",
        segment in "[a-z0-9_]{1,8}(/[a-z0-9_.]{1,8}){0,2}",
    ) {
        let joined = NormalizedPath::new(&base).join(&segment);
        let last = segment.rsplit('/').next().map(str::to_string);
        prop_assert_eq!(joined.file_name().map(str::to_string), last);
    }

    #[test]
    fn test_windows_and_unix_spellings_agree(
        parts in prop::collection::vec("[A-Za-z0-9-]{1,8}", 1..5),
    ) {
        let windows = NormalizedPath::new(parts.join("\\"));
        let unix = NormalizedPath::new(parts.join("/"));
        prop_assert_eq!(windows, unix);
    }
}
