use af_domain::profile::{Profile, ProfileField};

/// Wrap `body` in `<tag>` / `</tag>` lines. The body is inserted verbatim
/// and always ends with a newline before the closing tag.
pub fn format_block(tag: &str, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + tag.len() * 2 + 8);
    out.push('<');
    out.push_str(tag);
    out.push_str(">\n");
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out
}

/// One-line description of the AI persona. Missing fields render empty.
pub fn persona_line(profile: &Profile) -> String {
    format!(
        "이름: {}, 성격: {}, 생긴모습: {}",
        profile.get(ProfileField::AiName),
        profile.get(ProfileField::AiCharacter),
        profile.get(ProfileField::AiPrompt),
    )
}

/// One-line description of the child talking to the AI.
pub fn user_line(profile: &Profile) -> String {
    format!(
        "이름: {}, 나이: {}, 취미: {}, 좋아하는 것: {}, AI에게 하고 싶은 말: {}",
        profile.get(ProfileField::MyName),
        profile.get(ProfileField::MyAge),
        profile.get(ProfileField::MyHobby),
        profile.get(ProfileField::MyLike),
        profile.get(ProfileField::MyEtc),
    )
}
