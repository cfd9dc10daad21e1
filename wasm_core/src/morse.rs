//! Morse code translation and tone synthesis.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::OnceLock;

use serde::Serialize;

const TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('"', ".-..-."),
    ('@', ".--.-."),
];

// Fade in/out length per tone, avoids audible clicks.
const RAMP_MS: f32 = 5.0;
const MAX_WPM: u32 = 60;

static DECODE: OnceLock<HashMap<&'static str, char>> = OnceLock::new();

fn decode_table() -> &'static HashMap<&'static str, char> {
    DECODE.get_or_init(|| TABLE.iter().map(|(ch, code)| (*code, *ch)).collect())
}

fn code_for(ch: char) -> Option<&'static str> {
    let upper = ch.to_ascii_uppercase();
    TABLE
        .iter()
        .find(|(letter, _)| *letter == upper)
        .map(|(_, code)| *code)
}

/// Letters are separated by a space and words by ` / `. Unsupported
/// characters are skipped.
pub fn encode_morse(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter_map(code_for)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Unknown code groups decode to `?`.
pub fn decode_morse(code: &str) -> String {
    let table = decode_table();
    code.split('/')
        .map(|word| {
            word.split_whitespace()
                .map(|group| {
                    let normalized = group
                        .replace(['•', '·'], ".")
                        .replace(['—', '–', '_'], "-");
                    table.get(normalized.as_str()).copied().unwrap_or('?')
                })
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneSegment {
    pub on: bool,
    pub duration_ms: f32,
}

/// Duration of one dot at `wpm` words per minute (PARIS standard).
pub fn unit_ms(wpm: u32) -> f32 {
    1200.0 / wpm.clamp(1, MAX_WPM) as f32
}

fn push(segments: &mut Vec<ToneSegment>, on: bool, units: f32, unit: f32) {
    if let Some(last) = segments.last_mut() {
        if last.on == on && !on {
            last.duration_ms = last.duration_ms.max(units * unit);
            return;
        }
    }
    segments.push(ToneSegment {
        on,
        duration_ms: units * unit,
    });
}

/// On/off timeline: dot 1 unit, dash 3, gaps of 1 within a letter, 3
/// between letters and 7 between words.
pub fn tone_schedule(code: &str, wpm: u32) -> Vec<ToneSegment> {
    let unit = unit_ms(wpm);
    let mut segments = Vec::new();
    let words = code.split('/').map(str::trim).filter(|w| !w.is_empty());
    for (w_idx, word) in words.enumerate() {
        if w_idx > 0 {
            push(&mut segments, false, 7.0, unit);
        }
        for (l_idx, letter) in word.split_whitespace().enumerate() {
            if l_idx > 0 {
                push(&mut segments, false, 3.0, unit);
            }
            for (s_idx, symbol) in letter.chars().enumerate() {
                let units = match symbol {
                    '.' => 1.0,
                    '-' => 3.0,
                    _ => continue,
                };
                if s_idx > 0 {
                    push(&mut segments, false, 1.0, unit);
                }
                push(&mut segments, true, units, unit);
            }
        }
    }
    segments
}

/// Renders the schedule as mono PCM samples in `[-1, 1]`.
pub fn synthesize(
    code: &str,
    wpm: u32,
    frequency: f32,
    sample_rate: u32,
) -> Result<Vec<f32>, String> {
    if !(20.0..=20_000.0).contains(&frequency) {
        return Err("frequency must be between 20 Hz and 20 kHz".into());
    }
    if !(8_000..=192_000).contains(&sample_rate) {
        return Err("sample rate must be between 8 kHz and 192 kHz".into());
    }
    let rate = sample_rate as f32;
    let ramp = ((RAMP_MS / 1000.0) * rate) as usize;
    let mut samples = Vec::new();
    for segment in tone_schedule(code, wpm) {
        let count = ((segment.duration_ms / 1000.0) * rate).round() as usize;
        if !segment.on {
            samples.extend(std::iter::repeat_n(0.0, count));
            continue;
        }
        let ramp = ramp.min(count / 2);
        for i in 0..count {
            let envelope = if ramp == 0 {
                1.0
            } else if i < ramp {
                i as f32 / ramp as f32
            } else if i >= count - ramp {
                (count - i) as f32 / ramp as f32
            } else {
                1.0
            };
            let phase = TAU * frequency * i as f32 / rate;
            samples.push(phase.sin() * envelope * 0.8);
        }
    }
    Ok(samples)
}
