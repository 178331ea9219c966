//! 时长解析
//!
//! 支持 Go 风格的时长字符串，如 "20s"、"500ms"、"1m30s"、"1.5h"
use anyhow::{anyhow, Result};
use regex::Regex;
use std::time::Duration;

pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("时长为空"));
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let re = Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|ms|s|m|h)")?;
    let mut total = 0f64;
    let mut consumed = 0;
    for caps in re.captures_iter(input) {
        let whole = caps.get(0).ok_or_else(|| anyhow!("无法解析时长: {}", input))?;
        // 各段必须首尾相接
        if whole.start() != consumed {
            return Err(anyhow!("无法解析时长: {}", input));
        }
        consumed = whole.end();

        let value: f64 = caps[1]
            .parse()
            .map_err(|_| anyhow!("时长中的数字无效: {}", &caps[1]))?;
        let seconds_per_unit = match &caps[2] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            unit => return Err(anyhow!("未知的时间单位: {}", unit)),
        };
        total += value * seconds_per_unit;
    }

    if consumed != input.len() {
        return Err(anyhow!("无法解析时长: {}", input));
    }

    Ok(Duration::from_secs_f64(total))
}
