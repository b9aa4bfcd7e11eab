//! Centralized constants for Glossa.
//! Defaults live here so config, client and CLI agree on them.

// ─── Gemini API ───────────────────────────────────────────────────────────────

pub mod gemini {
    pub const BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const API_VERSION: &str = "v1beta";
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const HISTORY_FILE: &str = "chat_history.json";
    pub const TIMEOUT_SECS: u64 = 60;
    pub const THEME: &str = "dark";

    /// Sent with every request, never shown in the transcript.
    pub const SYSTEM_INSTRUCTION: &str = "\
你是我的个人文本处理助手。请严格遵守以下规则：

1. **核心任务**: 你的首要任务是翻译和润色。如果用户直接给出一段文本，默认将中文翻译为英文，其他语言均翻译为中文。不需要翻译中文指令。

2. **风格**: 你的输出必须专业、简洁、精确。避免口语化、模棱两可或过于冗长的表达。

3. **单词解析**: 如果用户的输入为一个单独的单词，请解释它的释义和用法，并给出例句。";
}

// ─── Display ──────────────────────────────────────────────────────────────────

pub mod display {
    pub const USER_LABEL: &str = "You";
    pub const ASSISTANT_LABEL: &str = "Assistant";
    /// Prefix put in front of a failed turn's error text.
    pub const ERROR_PREFIX: &str = "Error: ";
}
