//! Line-oriented decoder for device logs.

use std::io::BufRead;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};

use super::action::LogAction;
use super::category::CategoryMap;
use super::event::{LogEvent, LogEventKind};
use super::line::{LogFilePosition, LogLineContext, LogLineInfo};
use crate::context::SyncProcessingContext;
use crate::error::{Error, Result};
use crate::sink::TalkingBookDataSink;

/// `<prelude>:<ACTION>: <arguments>`
static LOG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]*):(\w+):*\s*(.*)$").unwrap());

/// Can follow any action.
static VOLTAGE_DROP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^VOLTAGE DROP:\s*([0-9.]+)v\s*in\s*(\d+)\s+sec$").unwrap()
});

/// `00046a_9_4E7A864E @VOL=03 @Volt=250`
static REST_OF_PLAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+@VOL=(\d+)\s+@Volt=(\S+)\s*$").unwrap());

/// `00046a_9_F70FDD0B 0002/0001sec @VOL=01 @Volt=202-Ended`
static REST_OF_PLAYED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\d+)/(\d+)sec\s+@VOL=(\d+)\s+@Volt=(\S+)\s*$").unwrap()
});

/// `00046a_9_7F67F127 -> 9`
static REST_OF_RECORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+->\s+(\d+)\s*$").unwrap());

/// `RECORDED (secs): 0004`
static REST_OF_RECORDED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^RECORDED\s+\(secs\):\s*(\d+)\s*$").unwrap());

/// Decodes the logs of one sync directory.
///
/// The only state carried between lines is the content last played, which
/// is the subject of pause, unpause and survey lines. It resets per file.
pub struct LogFileParser<'a> {
    context: Arc<SyncProcessingContext>,
    categories: &'a CategoryMap,
    content_last_played: String,
}

impl<'a> LogFileParser<'a> {
    pub fn new(context: Arc<SyncProcessingContext>, categories: &'a CategoryMap) -> Self {
        Self {
            context,
            categories,
            content_last_played: String::new(),
        }
    }

    pub fn content_last_played(&self) -> &str {
        &self.content_last_played
    }

    /// Decode every line of `reader`, dispatching events to `sink`.
    ///
    /// `on_log_file_end` is delivered even when reading fails part-way.
    pub fn parse(
        &mut self,
        file_name: &str,
        reader: impl BufRead,
        sink: &mut dyn TalkingBookDataSink,
    ) -> Result<()> {
        self.content_last_played.clear();
        sink.on_log_file_start(file_name);
        let result = self.parse_lines(file_name, reader, sink);
        sink.on_log_file_end();
        result
    }

    fn parse_lines(
        &mut self,
        file_name: &str,
        mut reader: impl BufRead,
        sink: &mut dyn TalkingBookDataSink,
    ) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_number = 0;
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| Error::io(file_name, e))?;
            if read == 0 {
                return Ok(());
            }

            // Lines end at `\n`, `\r\n` or a lone `\r`.
            let text = String::from_utf8_lossy(&buf);
            let chunk: &str = &text;
            let chunk = chunk.strip_suffix('\n').unwrap_or(chunk);
            let chunk = chunk.strip_suffix('\r').unwrap_or(chunk);
            for line in chunk.split('\r') {
                line_number += 1;
                if let Some(caps) = LOG_LINE.captures(line) {
                    let position = LogFilePosition {
                        file_name: file_name.to_string(),
                        line_number,
                    };
                    self.parse_action(position, &caps[1], &caps[2], &caps[3], sink);
                }
            }
        }
    }

    fn parse_action(
        &mut self,
        position: LogFilePosition,
        prelude: &str,
        action_word: &str,
        args: &str,
        sink: &mut dyn TalkingBookDataSink,
    ) {
        let Some(action) = LogAction::lookup(action_word) else {
            tracing::debug!(
                file = %position.file_name,
                line = position.line_number,
                "skipping unknown action {action_word}"
            );
            return;
        };

        let context = LogLineContext {
            info: LogLineInfo::parse(prelude),
            position,
            sync: Arc::clone(&self.context),
        };

        if let Some(caps) = VOLTAGE_DROP.captures(args) {
            match (caps[1].parse::<f64>(), caps[2].parse::<u32>()) {
                (Ok(voltage_dropped), Ok(seconds)) => emit(
                    sink,
                    context,
                    LogEventKind::VoltageDrop {
                        action,
                        voltage_dropped,
                        seconds,
                    },
                ),
                _ => invalid_number(&context, "voltage drop", args),
            }
            return;
        }

        match action {
            LogAction::Play => self.process_play(context, args, sink),
            LogAction::Played => self.process_played(context, args, sink),
            LogAction::Category => {
                let category = self.categories.resolve(args).to_string();
                emit(sink, context, LogEventKind::Category { category });
            }
            LogAction::Paused => {
                let content_id = self.content_last_played.clone();
                emit(sink, context, LogEventKind::Pause { content_id });
            }
            LogAction::Unpaused => {
                let content_id = self.content_last_played.clone();
                emit(sink, context, LogEventKind::Unpause { content_id });
            }
            LogAction::Record => process_record(context, args, sink),
            LogAction::TimeRecorded => process_recorded(context, args, sink),
            LogAction::Survey => self.process_survey(context, args, sink),
            LogAction::ShuttingDown => emit(sink, context, LogEventKind::ShuttingDown),
        }
    }

    fn process_play(
        &mut self,
        context: LogLineContext,
        args: &str,
        sink: &mut dyn TalkingBookDataSink,
    ) {
        let Some(caps) = check_for_match(&REST_OF_PLAY, "Play", args, &context) else {
            return;
        };
        let content_id = caps[1].to_string();
        self.content_last_played.clone_from(&content_id);

        match (caps[2].parse::<u32>(), parse_volts(&caps[3])) {
            (Ok(volume), Some(voltage)) => emit(
                sink,
                context,
                LogEventKind::Play {
                    content_id,
                    volume,
                    voltage,
                },
            ),
            _ => invalid_number(&context, "Play", args),
        }
    }

    fn process_played(
        &mut self,
        context: LogLineContext,
        args: &str,
        sink: &mut dyn TalkingBookDataSink,
    ) {
        let Some(caps) = check_for_match(&REST_OF_PLAYED, "Played", args, &context) else {
            return;
        };
        let content_id = caps[1].to_string();
        self.content_last_played.clone_from(&content_id);

        // `214` or `228-Ended`
        let mut voltage_parts = caps[5].split('-');
        let voltage = voltage_parts.next().and_then(parse_volts);
        let ended = match (voltage_parts.next(), voltage_parts.next()) {
            (Some(marker), None) => marker.eq_ignore_ascii_case("ended"),
            _ => false,
        };

        match (
            caps[2].parse::<u32>(),
            caps[3].parse::<u32>(),
            caps[4].parse::<u32>(),
            voltage,
        ) {
            (Ok(seconds_played), Ok(seconds_length), Ok(volume), Some(voltage)) => emit(
                sink,
                context,
                LogEventKind::Played {
                    content_id,
                    seconds_played,
                    seconds_length,
                    volume,
                    voltage,
                    ended,
                },
            ),
            _ => invalid_number(&context, "Played", args),
        }
    }

    fn process_survey(
        &mut self,
        context: LogLineContext,
        args: &str,
        sink: &mut dyn TalkingBookDataSink,
    ) {
        let content_id = self.content_last_played.clone();
        let answer = args.trim();
        let kind = if answer.eq_ignore_ascii_case("taken") {
            LogEventKind::Survey { content_id }
        } else if answer.eq_ignore_ascii_case("apply") {
            LogEventKind::SurveyCompleted {
                content_id,
                useful: true,
            }
        } else if answer.eq_ignore_ascii_case("useless") {
            LogEventKind::SurveyCompleted {
                content_id,
                useful: false,
            }
        } else {
            tracing::warn!(
                file = %context.position.file_name,
                line = context.position.line_number,
                "unrecognized survey answer: {args}"
            );
            return;
        };
        emit(sink, context, kind);
    }
}

fn process_record(context: LogLineContext, args: &str, sink: &mut dyn TalkingBookDataSink) {
    // Some firmware logs RECORD with nothing after it.
    if args.is_empty() {
        return;
    }
    let Some(caps) = check_for_match(&REST_OF_RECORD, "Record", args, &context) else {
        return;
    };
    match caps[2].parse::<u32>() {
        Ok(slot) => emit(
            sink,
            context,
            LogEventKind::Record {
                content_id: caps[1].to_string(),
                slot,
            },
        ),
        Err(_) => invalid_number(&context, "Record", args),
    }
}

fn process_recorded(context: LogLineContext, args: &str, sink: &mut dyn TalkingBookDataSink) {
    let Some(caps) = check_for_match(&REST_OF_RECORDED, "TimeRecorded", args, &context) else {
        return;
    };
    match caps[1].parse::<u32>() {
        Ok(seconds) => emit(sink, context, LogEventKind::Recorded { seconds }),
        Err(_) => invalid_number(&context, "TimeRecorded", args),
    }
}

fn emit(sink: &mut dyn TalkingBookDataSink, context: LogLineContext, kind: LogEventKind) {
    sink.on_log_event(&LogEvent { context, kind });
}

/// Voltages are logged in hundredths of a volt.
fn parse_volts(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().map(|v| v / 100.0)
}

fn check_for_match<'t>(
    pattern: &Regex,
    action: &str,
    args: &'t str,
    context: &LogLineContext,
) -> Option<Captures<'t>> {
    let caps = pattern.captures(args);
    if caps.is_none() && !args.eq_ignore_ascii_case("Feedback") {
        tracing::warn!(
            file = %context.position.file_name,
            line = context.position.line_number,
            "cannot match arguments in {action} action: {args}"
        );
    }
    caps
}

fn invalid_number(context: &LogLineContext, action: &str, args: &str) {
    tracing::warn!(
        file = %context.position.file_name,
        line = context.position.line_number,
        "invalid number in {action} action: {args}"
    );
}
