use serde::{Deserialize, Serialize};

/// 每分钟阅读字数
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// 阅读时间估算结果
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ReadingTime {
    /// 展示文本，例如 "3 min read"
    pub text: String,
    /// 估算分钟数
    pub minutes: f64,
    /// 字数
    pub words: usize,
}

/// 中日韩字符每个字计为一个词
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}')
}

/// 统计字数：CJK 字符逐字计数，其余按空白分隔计数
pub fn count_words(text: &str) -> usize {
    let mut words = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            words += 1;
            in_word = false;
        } else if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            words += 1;
            in_word = true;
        }
    }

    words
}

/// 估算正文的阅读时间
pub fn estimate(content: &str) -> ReadingTime {
    let words = count_words(content);
    let minutes = words as f64 / WORDS_PER_MINUTE;

    // 先保留两位小数再向上取整
    let rounded = (minutes * 100.0).round() / 100.0;
    let text = format!("{} min read", rounded.ceil() as u64);

    ReadingTime { text, minutes, words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_latin_words_by_whitespace() {
        assert_eq!(count_words("hello  world\nfoo\tbar"), 4);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn counts_each_cjk_character() {
        assert_eq!(count_words("你好世界"), 4);
        assert_eq!(count_words("wasm入门 guide"), 4);
    }

    #[test]
    fn estimate_rounds_up_to_whole_minutes() {
        let one = estimate(&"word ".repeat(10));
        assert_eq!(one.text, "1 min read");
        assert_eq!(one.words, 10);

        let three = estimate(&"word ".repeat(450));
        assert_eq!(three.text, "3 min read");
        assert!((three.minutes - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_tolerates_float_noise_at_boundary() {
        // 201 / 200 = 1.005，保留两位小数后为 1.00
        let boundary = estimate(&"w ".repeat(201));
        assert_eq!(boundary.text, "1 min read");
    }

    #[test]
    fn empty_document_reads_zero_minutes() {
        let empty = estimate("");
        assert_eq!(empty.words, 0);
        assert_eq!(empty.text, "0 min read");
    }
}
