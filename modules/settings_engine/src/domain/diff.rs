//! Invertible character-level patches over canonical JSON text
//!
//! Every committed change stores a patch that rebuilds the PREVIOUS value
//! from the NEW one, so history can be read backwards without storing full
//! snapshots. Values serialize canonically first (sorted keys, stable
//! number text), which keeps the patch deterministic for a given pair.
//!
//! Patch format, one op per line:
//!
//! ```text
//! =N      copy the next N chars of the current text
//! +text   chars present only in the current text (skipped when reverting)
//! -text   chars present only in the previous text (re-emitted when reverting)
//! ```
//!
//! Canonical JSON never contains a literal newline (control chars in string
//! values are escaped), so embedding segment text raw on one line is safe.

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

/// Failure raised while building or applying a patch
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Patch text does not parse as op lines
    #[error("malformed patch: {0}")]
    Malformed(String),
    /// Patch ops do not line up with the text they are applied to
    #[error("patch does not match value text at char {offset}")]
    Mismatch { offset: usize },
    /// Reconstructed text is not valid JSON
    #[error("reconstructed text is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a value to its canonical text form.
///
/// Object keys are already sorted (serde_json maps are BTree-backed) and
/// numbers render through itoa/ryu, so equal values produce identical text.
pub fn canonical_text(value: &Value) -> Result<String, PatchError> {
    Ok(serde_json::to_string(value)?)
}

/// Build the patch that rebuilds `old` from `new`
pub fn make_patch(old: &Value, new: &Value) -> Result<String, PatchError> {
    let old_text = canonical_text(old)?;
    let new_text = canonical_text(new)?;
    let diff = TextDiff::from_chars(old_text.as_str(), new_text.as_str());

    let mut ops: Vec<String> = Vec::new();
    let mut run_tag: Option<ChangeTag> = None;
    let mut run = String::new();
    for change in diff.iter_all_changes() {
        if run_tag != Some(change.tag()) {
            flush_run(&mut ops, run_tag, &mut run);
            run_tag = Some(change.tag());
        }
        run.push_str(change.value());
    }
    flush_run(&mut ops, run_tag, &mut run);

    Ok(ops.join("\n"))
}

fn flush_run(ops: &mut Vec<String>, tag: Option<ChangeTag>, run: &mut String) {
    if run.is_empty() {
        return;
    }
    match tag {
        Some(ChangeTag::Equal) => ops.push(format!("={}", run.chars().count())),
        Some(ChangeTag::Delete) => ops.push(format!("-{run}")),
        Some(ChangeTag::Insert) => ops.push(format!("+{run}")),
        None => {}
    }
    run.clear();
}

/// Rebuild the previous value by applying `patch` backwards over `new`.
///
/// Every op is verified against the text it claims to describe: copy counts
/// must stay in range, `+` segments must match the current text exactly, and
/// the cursor must land on the final char. Any disagreement means the patch
/// was not produced from this value.
pub fn apply_inverse(new: &Value, patch: &str) -> Result<Value, PatchError> {
    let new_text = canonical_text(new)?;
    let chars: Vec<char> = new_text.chars().collect();
    let mut cursor = 0usize;
    let mut old_text = String::with_capacity(new_text.len());

    for line in patch.split('\n') {
        let op = line
            .chars()
            .next()
            .ok_or_else(|| PatchError::Malformed("empty op line".to_string()))?;
        let body = &line[op.len_utf8()..];
        match op {
            '=' => {
                let count: usize = body.parse().map_err(|_| {
                    PatchError::Malformed(format!("bad copy count {body:?}"))
                })?;
                // cursor <= chars.len() holds throughout, so the
                // subtraction cannot wrap on a hostile copy count.
                if count > chars.len() - cursor {
                    return Err(PatchError::Mismatch { offset: cursor });
                }
                old_text.extend(&chars[cursor..cursor + count]);
                cursor += count;
            }
            '+' => {
                for expected in body.chars() {
                    match chars.get(cursor) {
                        Some(c) if *c == expected => cursor += 1,
                        _ => return Err(PatchError::Mismatch { offset: cursor }),
                    }
                }
            }
            '-' => {
                old_text.push_str(body);
            }
            other => {
                return Err(PatchError::Malformed(format!("unknown op {other:?}")));
            }
        }
    }

    if cursor != chars.len() {
        return Err(PatchError::Mismatch { offset: cursor });
    }

    Ok(serde_json::from_str(&old_text)?)
}
