//! Domain Services
//!
//! Prompt templates and parsing of the LLM answer into scenes.

use crate::domain::value_objects::{ArtStyle, SceneCount};

/// Chat prompt sent to the script model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPrompt {
    pub system: String,
    pub user: String,
}

/// Build the script prompt for a whole comic, or for one scene of it
pub fn build_script_prompt(content: &str, count: SceneCount, scene: Option<u32>) -> ScriptPrompt {
    let n = count.get();
    let task = match scene {
        Some(k) => format!(
            "The comic has {n} scenes in total. Write only scene {k}, \
             starting with the line \"Scene {k}:\"."
        ),
        None => format!(
            "Write exactly {n} scenes. Start each scene on its own line with \
             \"Scene N:\" where N runs from 1 to {n}."
        ),
    };

    let system = format!(
        "You are a comic script writer. You turn articles into short comics. \
         Every scene describes a single panel: setting, characters, action and \
         any dialogue, concrete enough for an illustrator to draw. \
         {task} Do not add a title, notes or any text outside the scenes."
    );

    ScriptPrompt {
        system,
        user: content.trim().to_string(),
    }
}

/// Split the model answer into at most `limit` scene texts
///
/// Scenes are delimited by `Scene N:` headings. An answer without headings
/// falls back to blank-line separated paragraphs.
pub fn parse_scenes(answer: &str, limit: usize) -> Vec<String> {
    let mut scenes = split_on_headings(answer);
    if scenes.is_empty() {
        scenes = split_paragraphs(answer);
    }
    scenes.truncate(limit);
    scenes
}

fn split_on_headings(answer: &str) -> Vec<String> {
    let mut scenes: Vec<Vec<&str>> = Vec::new();
    for line in answer.lines() {
        match scene_heading(line) {
            Some(rest) => scenes.push(vec![rest]),
            // Text before the first heading is preamble
            None => {
                if let Some(current) = scenes.last_mut() {
                    current.push(line.trim_end());
                }
            }
        }
    }

    scenes
        .into_iter()
        .map(|lines| lines.join("\n").trim().to_string())
        .filter(|scene| !scene.is_empty())
        .collect()
}

fn split_paragraphs(answer: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in answer.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Text following a `Scene N:` heading, tolerating markdown emphasis
fn scene_heading(line: &str) -> Option<&str> {
    let line = line.trim().trim_start_matches(['#', '*', ' ']);
    let rest = line
        .get(..5)
        .filter(|prefix| prefix.eq_ignore_ascii_case("scene"))
        .map(|_| line[5..].trim_start())?;

    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let rest = rest[digits..].trim_start().trim_start_matches('*').trim_start();
    if rest.is_empty() {
        return Some(rest);
    }
    let rest = rest.strip_prefix([':', '.', ')', '-'])?;
    Some(rest.trim().trim_start_matches('*').trim())
}

/// Image prompt: style preset, then the scene, then what to avoid
pub fn build_image_prompt(script: &str, style: ArtStyle, negative_prompt: Option<&str>) -> String {
    let mut prompt = format!("{}. {}", style.preset(), script.trim());
    if let Some(negative) = negative_prompt.map(str::trim).filter(|n| !n.is_empty()) {
        prompt.push_str(" Avoid: ");
        prompt.push_str(negative);
        prompt.push('.');
    }
    prompt
}
