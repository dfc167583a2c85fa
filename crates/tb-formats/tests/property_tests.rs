use std::io::Cursor;
use std::sync::Arc;

use proptest::prelude::*;
use tb_formats::{
    CategoryMap, FlashData, LogFileParser, RecordingSink, StatsFile, SyncProcessingContext,
};

fn counter() -> impl Strategy<Value = i32> {
    0..150i32
}

proptest! {
    #[test]
    fn test_stats_file_survives_encoding(
        serial_number in "[A-Za-z0-9-]{0,12}",
        message_id in "[A-Za-z0-9_]{0,20}",
        counts in prop::array::uniform6(counter()),
    ) {
        let stats = StatsFile {
            serial_number,
            message_id,
            open_count: counts[0],
            completion_count: counts[1],
            copy_count: counts[2],
            survey_count: counts[3],
            applied_count: counts[4],
            useless_count: counts[5],
        };
        prop_assert_eq!(StatsFile::decode(&stats.encode()), Ok(stats));
    }

    #[test]
    fn test_stats_file_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = StatsFile::decode(&bytes);
    }

    #[test]
    fn test_flash_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..8000)) {
        if let Ok(flash) = FlashData::decode(&bytes) {
            let _ = flash.all_stats();
            let _ = flash.is_valid();
        }
    }

    #[test]
    fn test_log_parser_emits_at_most_one_event_per_line(text in "(\\PC{0,60}\n){0,20}") {
        let categories = CategoryMap::default();
        let mut parser = LogFileParser::new(Arc::new(SyncProcessingContext::default()), &categories);
        let mut sink = RecordingSink::default();
        parser.parse("fuzz", Cursor::new(text.as_bytes()), &mut sink).unwrap();

        prop_assert!(sink.events.len() <= text.lines().count());
        prop_assert_eq!(sink.files_ended, 1);
    }
}
