use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::remark::{Remark, RemarkKind, RemarkProvider};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const SYSTEM_INSTRUCTION: &str =
    "You are Sparky, a cheerful space robot. Be lightning fast. MAX 10 words. 🤖🚀";
const EMPTY_REPLY: &str = "Onward, Cadet! 🚀";

/// Remarks from the Gemini REST API.
pub struct GeminiRemarks {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiRemarks {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// `None` when the key variable is unset or empty.
    pub fn from_env(key_var: &str, model: &str) -> Option<Self> {
        let key = std::env::var(key_var).ok().filter(|k| !k.trim().is_empty())?;
        match Self::new(key, model) {
            Ok(provider) => Some(provider),
            Err(err) => {
                tracing::warn!(%err, "Could not build remark client");
                None
            }
        }
    }
}

pub(crate) fn prompt(word: &str, was_correct: bool, streak: u32) -> String {
    if was_correct {
        format!(
            "A student correctly translated \"{word}\". Streak: {streak}. \
             Give a 1-sentence funny cosmic encouragement with emojis."
        )
    } else {
        format!(
            "Student needs a tiny hint for the English word \"{word}\". \
             Don't say the word. Encourage them."
        )
    }
}

impl RemarkProvider for GeminiRemarks {
    fn get_remark(&self, word: &str, was_correct: bool, streak: u32) -> Result<Remark> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt(word, was_correct, streak),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 50,
            },
        };
        let url = format!("{BASE_URL}/{}:generateContent", self.model);
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .context("Gemini request failed")?;
        if !response.status().is_success() {
            bail!("Gemini returned {}", response.status());
        }
        let reply: GenerateContentResponse = response.json().context("Gemini reply malformed")?;

        let text = reply
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|p| p.text)
            .collect::<String>();
        let text = match text.trim() {
            "" => EMPTY_REPLY.to_string(),
            trimmed => trimmed.to_string(),
        };
        let kind = if was_correct {
            RemarkKind::Encouragement
        } else {
            RemarkKind::Hint
        };
        Ok(Remark { text, kind })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_mention_word_and_streak() {
        let p = prompt("mirror", false, 0);
        assert!(p.contains("\"mirror\""));
        assert!(p.contains("Don't say the word"));
        assert!(prompt("mirror", true, 4).contains("Streak: 4"));
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let body = GenerateContentRequest {
            contents: Vec::new(),
            system_instruction: Content::default(),
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 50,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 50);
    }

    #[test]
    fn response_parts_are_joined() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Zoom"},{"text":"!"}]}}]}"#;
        let reply: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = reply
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .map(|p| p.text)
            .collect();
        assert_eq!(text, "Zoom!");
    }
}
