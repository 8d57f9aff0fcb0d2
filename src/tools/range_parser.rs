//! 解析使用者輸入的時長範圍
//!
//! 接受 `(0,30]`、`[55,120]`、`[56,)`、`0,30` 等寫法。括號只是外觀，
//! 語意固定為 `(min, max]`；空白的下限為 0，空白的上限為無限大。
//! 只有一個數字時視為上限。

use crate::config::DurationRangeSettings;
use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

static REGEX_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\(\[]?\s*(?P<min>[^,\(\)\[\]]*?)\s*,\s*(?P<max>[^,\(\)\[\]]*?)\s*[\)\]]?\s*$")
        .expect("Invalid regex")
});

static REGEX_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\(\[]?\s*(?P<max>[^,\(\)\[\]]+?)\s*[\)\]]?\s*$").expect("Invalid regex")
});

pub fn parse_duration_range(input: &str) -> Result<DurationRangeSettings> {
    if input.trim().is_empty() {
        return Ok(DurationRangeSettings::default());
    }

    let (min_str, max_str) = if let Some(caps) = REGEX_RANGE.captures(input) {
        (caps["min"].to_string(), caps["max"].to_string())
    } else if let Some(caps) = REGEX_SINGLE.captures(input) {
        (String::new(), caps["max"].to_string())
    } else {
        bail!("無法解析時長範圍: {input}");
    };

    let min_seconds = match parse_bound(&min_str)? {
        Some(min) if min.is_finite() => min,
        Some(_) => bail!("下限必須是有限數值: {min_str}"),
        None => 0.0,
    };

    // 只有正無限大代表無上限
    let max_seconds = match parse_bound(&max_str)? {
        Some(max) if max == f64::NEG_INFINITY => bail!("上限不能是負無限大: {max_str}"),
        Some(max) if max.is_finite() => Some(max),
        _ => None,
    };

    Ok(DurationRangeSettings {
        min_seconds,
        max_seconds,
    })
}

fn parse_bound(value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value == "∞" {
        return Ok(Some(f64::INFINITY));
    }
    match value.parse::<f64>() {
        Ok(number) if !number.is_nan() => Ok(Some(number)),
        _ => bail!("不是有效的秒數: {value}"),
    }
}
