use std::sync::atomic::{AtomicBool, Ordering};

// Debug messages are only written when verbose mode is on
static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);

// Defines the type of logs
#[derive (Debug, strum::Display)]
#[strum (serialize_all = "UPPERCASE")]
pub enum LogTypes {
    Info,
    Warning,
    Error,
    Debug
}

// Defines where the logs can come from
#[derive (Debug, strum::Display)]
#[strum (serialize_all = "UPPERCASE")]
pub enum LogSources {
    Quartz,
    Lexer,
    Parser,
    GrammarChecker,
    SemanticAnalyzer,
    CodeGenerator
}

pub fn set_verbose(enabled: bool) {
    VERBOSE_MODE.store(enabled, Ordering::Relaxed);
}

fn is_verbose_mode() -> bool {
    return VERBOSE_MODE.load(Ordering::Relaxed);
}

// Function that logs a message with the given type and source
pub fn log(log_type: LogTypes, src: LogSources, msg: String) {
    if matches!(log_type, LogTypes::Debug) && !is_verbose_mode() {
        return;
    }

    eprintln!("[{} - {}]: {}", log_type, src, msg);
}
