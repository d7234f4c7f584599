//! User-facing message texts
//!
//! All texts are sent with HTML parse mode.

use crate::state_machine::BagColor;

pub const RESTART_HINT: &str = "/start";

pub fn welcome(form_enabled: bool) -> String {
    let mut text = String::from(
        "<b>Hi!</b> Let's make a photo of you with a NANO BANANA bag.\n\n\
         Step 1: send your <b>photo</b> (as an image, not as a file).\n",
    );
    if form_enabled {
        text.push_str("\nYou can also open the mini app to pick a colour.");
    }
    text
}

pub fn choose_color() -> &'static str {
    "Step 2: pick a <b>bag colour</b>.\nUse the buttons below or the mini app."
}

pub fn quick_choice() -> &'static str {
    "Quick colour choice:"
}

pub fn photo_required() -> &'static str {
    "I need a photo. Please send an image."
}

pub fn unknown_color() -> &'static str {
    "Unknown colour. Please pick one of the options."
}

pub fn missing_photo() -> String {
    format!("I couldn't find your photo in this session. Please send it again: {RESTART_HINT}")
}

pub fn processing(choice: BagColor) -> String {
    format!(
        "Okay, colour: <b>{}</b>.\n\nStep 3: processing your photo… ⏳",
        choice.label()
    )
}

pub fn download_failed() -> String {
    format!("I couldn't download your photo. Send it again with {RESTART_HINT}.")
}

pub fn generation_failed() -> String {
    format!(
        "😔 I couldn't get an image from the generator. Try again later or use another photo.\n\
         Restart: {RESTART_HINT}"
    )
}

pub fn result_caption() -> String {
    format!("Done! Want another one? {RESTART_HINT}")
}

pub fn help() -> String {
    format!("Press {RESTART_HINT} and follow the steps: 1) photo → 2) colour (buttons or mini app) → 3) result.")
}
