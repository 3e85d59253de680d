use crate::session::SessionState;

pub const SAVED_PROMPTS: [&str; 5] = [
    "A futuristic city skyline at sunset",
    "A koala sitting in a eucalyptus tree, watercolor style",
    "A cyberpunk kangaroo in Sydney",
    "Outback landscape with dramatic clouds, photorealistic",
    "Abstract art inspired by the Australian bush",
];

pub fn preset(index: usize) -> Option<&'static str> {
    SAVED_PROMPTS.get(index).copied()
}

/// Copies the preset at `index` into the session's prompt. Returns the
/// selected text, or `None` if there is no such preset.
pub fn select_preset(session: &mut SessionState, index: usize) -> Option<&'static str> {
    let prompt = preset(index)?;
    session.set_prompt(prompt);
    log::debug!("Selected saved prompt #{}: {}", index, prompt);
    Some(prompt)
}
