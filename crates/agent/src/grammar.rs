//! Response grammars: hand-written matchers for model output.
//!
//! Every marker is matched ASCII case-insensitively. Offsets found in the
//! lowercased copy are valid in the original text because ASCII lowercasing
//! never changes byte lengths.
//!
//! | Grammar | Used by | Shape |
//! |---------|---------|-------|
//! | Thought/Action | ReAct | `Thought: ...` then `Action: ...` |
//! | Tool action | ReAct | `name: input` |
//! | Reasoning/Conclusion | Chain of Thought | `**Reasoning:** ... **Conclusion:** ...` |
//! | Plan | Plan-and-Execute | `1. step` lines |
//! | Bracket call | Plan-and-Execute | `[name(argument)]` |

use thiserror::Error;

/// Upper bound on plan length. Longer plans are truncated, not rejected.
pub const MAX_PLAN_STEPS: usize = 10;

const FINAL_ANSWER: &str = "final answer:";

// ── ReAct ──────────────────────────────────────────────────────────────────

/// One parsed ReAct turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactStep {
    pub thought: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactParseError {
    #[error("response has no 'Thought:' field")]
    MissingThought,
    #[error("response has no 'Action:' field")]
    MissingAction,
}

/// Extract the Thought and Action fields of a ReAct response.
///
/// The Action marker is the first `action:` not glued to a preceding word;
/// its text runs to the end of the line on which it starts (blank lines
/// after the marker are skipped). The Thought is everything between the first
/// `thought:` and the next Action marker.
pub fn parse_react(text: &str) -> Result<ReactStep, ReactParseError> {
    let lower = text.to_ascii_lowercase();

    let action = find_action_marker(&lower, 0)
        .map(|(_, end)| {
            let rest = text[end..].trim_start();
            rest.lines().next().unwrap_or("").trim().to_string()
        })
        .filter(|a| !a.is_empty());

    let thought = lower
        .find("thought:")
        .map(|start| {
            let body = start + "thought:".len();
            let stop = find_action_marker(&lower, body)
                .map(|(marker, _)| marker)
                .unwrap_or(text.len());
            text[body..stop].trim().to_string()
        })
        .filter(|t| !t.is_empty());

    match (thought, action) {
        (None, _) => Err(ReactParseError::MissingThought),
        (_, None) => Err(ReactParseError::MissingAction),
        (Some(thought), Some(action)) => Ok(ReactStep { thought, action }),
    }
}

/// Returns (marker start, text start) of the first standalone `action:` at or after `from`.
fn find_action_marker(lower: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some(pos) = lower[search..].find("action:") {
        let start = search + pos;
        let standalone = lower[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        if standalone {
            return Some((start, start + "action:".len()));
        }
        search = start + "action:".len();
    }
    None
}

/// If the action is a final answer, return the answer text.
///
/// Exactly the `Final Answer:` literal is stripped; the remainder is trimmed.
pub fn final_answer(action: &str) -> Option<&str> {
    let head = action.get(..FINAL_ANSWER.len())?;
    if head.eq_ignore_ascii_case(FINAL_ANSWER) {
        Some(action[FINAL_ANSWER.len()..].trim())
    } else {
        None
    }
}

/// Split a `name: input` action on its first colon.
pub fn split_tool_action(action: &str) -> Option<(&str, &str)> {
    action
        .split_once(':')
        .map(|(name, input)| (name.trim(), input.trim()))
}

/// Observation text for an action that is not `name: input`.
pub fn invalid_action_observation(action: &str) -> String {
    format!("Invalid action format. Expected 'tool_name: input', got '{action}'")
}

// ── Chain of Thought ───────────────────────────────────────────────────────

/// The two sections of a Chain of Thought response. Empty sections are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CotSections {
    pub reasoning: Option<String>,
    pub conclusion: Option<String>,
}

/// Split a response into its Reasoning and Conclusion sections.
pub fn parse_cot(text: &str) -> CotSections {
    let lower = text.to_ascii_lowercase();
    let conclusion_at = lower.find("conclusion:");

    let reasoning = lower.find("reasoning:").and_then(|start| {
        let body = start + "reasoning:".len();
        match lower[body..].find("conclusion:") {
            Some(p) => clean_section(&text[body..body + p], true),
            None => clean_section(&text[body..], false),
        }
    });

    let conclusion =
        conclusion_at.and_then(|start| clean_section(&text[start + "conclusion:".len()..], false));

    CotSections {
        reasoning,
        conclusion,
    }
}

/// Drop the `**` that closes a `**Reasoning:**` style marker, and the one
/// opening the next marker when `before_marker` is set, then trim whitespace.
/// Bold inside the section survives.
fn clean_section(section: &str, before_marker: bool) -> Option<String> {
    let section = section.strip_prefix("**").unwrap_or(section);
    let section = if before_marker {
        section.strip_suffix("**").unwrap_or(section)
    } else {
        section
    };
    let cleaned = section.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Split reasoning text on `Step N:` markers.
///
/// Text before the first marker is ignored; empty items are dropped.
pub fn reasoning_steps(reasoning: &str) -> Vec<String> {
    let lower = reasoning.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut markers: Vec<(usize, usize)> = Vec::new();
    let mut search = 0;

    while let Some(pos) = lower[search..].find("step ") {
        let start = search + pos;
        let mut i = start + "step ".len();
        let digits_from = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i > digits_from && bytes.get(i) == Some(&b':') {
            markers.push((start, i + 1));
            search = i + 1;
        } else {
            search = start + "step ".len();
        }
    }

    markers
        .iter()
        .enumerate()
        .filter_map(|(n, &(_, body))| {
            let stop = markers.get(n + 1).map(|m| m.0).unwrap_or(reasoning.len());
            let item = reasoning[body..stop].trim();
            (!item.is_empty()).then(|| item.to_string())
        })
        .collect()
}

// ── Plan-and-Execute ───────────────────────────────────────────────────────

/// Extract plan steps from a planning response.
///
/// Numbered lines (`3. do the thing`) are taken in order. Without any, every
/// non-empty line that is not a `**` heading becomes a step. At most
/// [`MAX_PLAN_STEPS`] are returned.
pub fn plan_steps(text: &str) -> Vec<String> {
    let numbered: Vec<String> = text.lines().filter_map(numbered_item).collect();

    let steps = if numbered.is_empty() {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("**"))
            .map(str::to_string)
            .collect()
    } else {
        numbered
    };

    steps.into_iter().take(MAX_PLAN_STEPS).collect()
}

fn numbered_item(line: &str) -> Option<String> {
    let line = line.trim_start();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let item = line[digits..].strip_prefix('.')?.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// A `[name(argument)]` tool request found in step output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketCall<'a> {
    pub name: &'a str,
    pub argument: &'a str,
}

/// Find every `[name(argument)]` in `text`, left to right, without overlap.
///
/// `name` is one or more ASCII letters, digits or underscores; `argument`
/// is one or more characters other than `)`.
pub fn bracket_calls(text: &str) -> Vec<BracketCall<'_>> {
    let bytes = text.as_bytes();
    let mut calls = Vec::new();
    let mut i = 0;

    while let Some(pos) = text[i..].find('[') {
        let open = i + pos;
        match bracket_call_at(text, bytes, open) {
            Some((call, end)) => {
                calls.push(call);
                i = end;
            }
            None => i = open + 1,
        }
    }

    calls
}

fn bracket_call_at<'a>(text: &'a str, bytes: &[u8], open: usize) -> Option<(BracketCall<'a>, usize)> {
    let name_from = open + 1;
    let mut i = name_from;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == name_from || bytes.get(i) != Some(&b'(') {
        return None;
    }

    let arg_from = i + 1;
    let close = arg_from + text[arg_from..].find(')')?;
    if close == arg_from || bytes.get(close + 1) != Some(&b']') {
        return None;
    }

    Some((
        BracketCall {
            name: &text[name_from..i],
            argument: &text[arg_from..close],
        },
        close + 2,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ReAct ──

    #[test]
    fn react_thought_and_action() {
        let step = parse_react("Thought: need math\nAction: calculator: 25*4+10").unwrap();
        assert_eq!(step.thought, "need math");
        assert_eq!(step.action, "calculator: 25*4+10");
    }

    #[test]
    fn react_markers_are_case_insensitive() {
        let step = parse_react("THOUGHT: hmm\naction: search: rust").unwrap();
        assert_eq!(step.thought, "hmm");
        assert_eq!(step.action, "search: rust");
    }

    #[test]
    fn react_thought_spans_lines() {
        let step = parse_react("Thought: first line\nsecond line\nAction: Final Answer: ok").unwrap();
        assert_eq!(step.thought, "first line\nsecond line");
    }

    #[test]
    fn react_action_is_single_line() {
        let step = parse_react("Thought: t\nAction: search: a\nObservation: made up").unwrap();
        assert_eq!(step.action, "search: a");
    }

    #[test]
    fn react_action_text_may_start_on_next_line() {
        let step = parse_react("Thought: t\nAction:\n  weather: Paris").unwrap();
        assert_eq!(step.action, "weather: Paris");
    }

    #[test]
    fn react_action_marker_inside_word_is_ignored() {
        let step = parse_react("Thought: check the reaction: fast\nAction: search: chemistry").unwrap();
        assert_eq!(step.thought, "check the reaction: fast");
        assert_eq!(step.action, "search: chemistry");
    }

    #[test]
    fn react_missing_fields() {
        assert_eq!(
            parse_react("Action: search: x"),
            Err(ReactParseError::MissingThought)
        );
        assert_eq!(
            parse_react("Thought: only thinking"),
            Err(ReactParseError::MissingAction)
        );
        assert_eq!(
            parse_react("Thought: t\nAction:   "),
            Err(ReactParseError::MissingAction)
        );
        assert!(parse_react("**Reasoning:** nope").is_err());
    }

    #[test]
    fn final_answer_strips_literal_only() {
        assert_eq!(final_answer("Final Answer: 110"), Some("110"));
        assert_eq!(final_answer("FINAL ANSWER:   done  "), Some("done"));
        assert_eq!(final_answer("Final Answer:: odd"), Some(": odd"));
        assert_eq!(final_answer("final answer"), None);
        assert_eq!(final_answer("calculator: 1+1"), None);
        assert_eq!(final_answer("é"), None);
    }

    #[test]
    fn tool_action_split() {
        assert_eq!(split_tool_action("calculator: 2 + 2"), Some(("calculator", "2 + 2")));
        assert_eq!(split_tool_action("search: a: b"), Some(("search", "a: b")));
        assert_eq!(split_tool_action("just text"), None);
        assert_eq!(
            invalid_action_observation("just text"),
            "Invalid action format. Expected 'tool_name: input', got 'just text'"
        );
    }

    // ── Chain of Thought ──

    #[test]
    fn cot_sections() {
        let text = "**Reasoning:**\nStep 1: a\nStep 2: b\n\n**Conclusion:**\nThe answer is 4.";
        let parsed = parse_cot(text);
        assert_eq!(parsed.reasoning.as_deref(), Some("Step 1: a\nStep 2: b"));
        assert_eq!(parsed.conclusion.as_deref(), Some("The answer is 4."));
    }

    #[test]
    fn cot_without_conclusion() {
        let parsed = parse_cot("Reasoning: Step 1: think hard");
        assert_eq!(parsed.reasoning.as_deref(), Some("Step 1: think hard"));
        assert!(parsed.conclusion.is_none());
        assert_eq!(parse_cot("just an answer"), CotSections::default());
    }

    #[test]
    fn cot_keeps_bold_inside_sections() {
        let parsed = parse_cot("**Conclusion:** The answer is **110**");
        assert_eq!(parsed.conclusion.as_deref(), Some("The answer is **110**"));

        let text = "**Reasoning:**\nStep 1: **25 * 4** is 100\n\n**Conclusion:**\nThe answer is **110**";
        let parsed = parse_cot(text);
        assert_eq!(parsed.reasoning.as_deref(), Some("Step 1: **25 * 4** is 100"));
        assert_eq!(parsed.conclusion.as_deref(), Some("The answer is **110**"));

        let parsed = parse_cot("Reasoning: it is **key**\nConclusion: **bold** start");
        assert_eq!(parsed.reasoning.as_deref(), Some("it is **key**"));
        assert_eq!(parsed.conclusion.as_deref(), Some("**bold** start"));
    }

    #[test]
    fn cot_empty_sections_are_absent() {
        let parsed = parse_cot("**Reasoning:**\n**Conclusion:**   ");
        assert!(parsed.reasoning.is_none());
        assert!(parsed.conclusion.is_none());
    }

    #[test]
    fn steps_split_on_markers() {
        let steps = reasoning_steps("Intro\nStep 1: add\nSTEP 2: multiply\nstep 3:\nStep 10: done");
        assert_eq!(steps, vec!["add", "multiply", "done"]);
    }

    #[test]
    fn steps_none_found() {
        assert!(reasoning_steps("I simply know it").is_empty());
        assert!(reasoning_steps("step two: nope").is_empty());
    }

    // ── Plan-and-Execute ──

    #[test]
    fn plan_numbered_lines() {
        let steps = plan_steps("Here is the plan:\n1. Search\n  2. Calculate\n3.\n4.Report");
        assert_eq!(steps, vec!["Search", "Calculate", "Report"]);
    }

    #[test]
    fn plan_fallback_lines() {
        let steps = plan_steps("**PLAN:**\n\n- look it up\n  then answer  ");
        assert_eq!(steps, vec!["- look it up", "then answer"]);
    }

    #[test]
    fn plan_truncated_to_limit() {
        let text: String = (1..=12).map(|i| format!("{i}. step {i}\n")).collect();
        let steps = plan_steps(&text);
        assert_eq!(steps.len(), MAX_PLAN_STEPS);
        assert_eq!(steps[9], "step 10");
    }

    #[test]
    fn bracket_calls_found_in_order() {
        let calls = bracket_calls("Use [calculator(2+2)] then [weather(Paris)].");
        assert_eq!(
            calls,
            vec![
                BracketCall { name: "calculator", argument: "2+2" },
                BracketCall { name: "weather", argument: "Paris" },
            ]
        );
    }

    #[test]
    fn bracket_calls_reject_malformed() {
        assert!(bracket_calls("[calc()]").is_empty());
        assert!(bracket_calls("[(x)]").is_empty());
        assert!(bracket_calls("[calc(x) ]").is_empty());
        assert!(bracket_calls("[my tool(x)]").is_empty());
        assert!(bracket_calls("no calls here").is_empty());
    }

    #[test]
    fn bracket_call_after_stray_bracket() {
        let calls = bracket_calls("[[search(rust lang)]");
        assert_eq!(calls, vec![BracketCall { name: "search", argument: "rust lang" }]);
    }
}
