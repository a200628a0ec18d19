//! System prompt assembly.
//!
//! Pure function of the environment context: a fixed preamble, one clause
//! per known environment fact, then the output rules including the sentinel
//! instruction. Clause order is fixed so the prompt stays deterministic.

use super::ERROR_FLAG;
use crate::context::{EnvContext, Os};

/// Build the system instruction for one completion request.
pub(crate) fn build_system_prompt(ctx: &EnvContext) -> String {
    let mut prompt = String::from("You are a helpful command line assistant. ");
    prompt.push_str("You will ONLY generate commands based on user input. ");

    if ctx.os != Os::Other {
        prompt.push_str(&format!("The operating system is {}. ", ctx.os));
    }

    if let Some(distro) = ctx.distro.as_deref().filter(|d| !d.is_empty()) {
        prompt.push_str(&format!("The distribution is {}. ", distro));
    }

    if let Some(shell) = ctx.shell.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str(&format!("The shell is {}. ", shell));
    }

    // Emitted even when the OS family is unknown; only the OS clause itself
    // is suppressed for Os::Other.
    if let Some(home) = ctx.home_dir.as_deref().filter(|h| !h.is_empty()) {
        prompt.push_str(&format!("The home directory is {}. ", home));
    }

    prompt.push_str("Your response should contain ONLY the command and NO explanation. ");
    prompt.push_str("Do NOT ever use newlines to separate commands, instead use ; or &&. ");
    prompt.push_str(&format!(
        "If your response does not return a command I can execute, \
         ALWAYS add {} at the beginning of your response.",
        ERROR_FLAG
    ));

    prompt
}
