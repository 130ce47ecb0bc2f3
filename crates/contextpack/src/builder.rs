use af_domain::profile::Profile;

use crate::injection::{format_block, persona_line, user_line};
use crate::report::{BlockReport, PromptKind, PromptReport};

const CHAT_PREAMBLE: &str = "\
너는 어린이의 매우 친절한 인공지능 친구야.
너의 정보는 <ai> tag 안에 있어. 너를 만들었으며 지금 대화중인 사람의 정보는 <user> tag 안에 있어.
답변할 때는 인공지능의 정보와 대화중인 사람의 정보를 참고해줘. 항상 언급하진 안아도 돼.";

const CHAT_INSTRUCTIONS: &str = "\
<history> tag 안에 있는 대화 기록 다음으로 주어진 <query> tag 안에 있는 질문에 대해서 대답해 줘.
생성하는 응답중에 영어는 모두 한글로 번역하고해줘. 대답할 때 태그는 모두 제외해줘.
대답은 모두 한 줄로 많이 짧게 해줘.";

const INTRO_PREAMBLE: &str = "\
ai 가 사용자에게 자신을 소개하는 문장을 모두 한글로 만들거야.
사용자는 어린이고 이름이 있다면 제일 먼저 불러줘. 그리고 만들어줘서 고맙다고 애기해.
너는 매우 친절한 ai 임을 명심해. 최종 출력은 모두 한글로 번역하고 태그와 영어는 포함하지 말아줘.
친구에게 말 하듯이 일관된 말투를 사용해. 존댓말은 하지마.";

const INTRO_INSTRUCTIONS: &str = "\
활용해야 할 ai 정보는 <ai-info> 태그 안에 있고 사용자 정보는 <user> 태그 안에 있어
최근 대화 기록은 <history> 태그 안에 있어.
없는 정보는 활용하지 말고 있는 정보는 최대한 활용해.
짧게 요약해.";

/// Deterministic prompt composer.
///
/// Pure: the output depends only on the profile, the windowed history and
/// the query. Each data block sits between its own `<tag>` delimiters; the
/// instructions asking the model to drop them are text only and nothing
/// checks the model's compliance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for one conversational turn: persona, user, history, query.
    pub fn compose_chat(&self, profile: &Profile, history: &str, query: &str) -> (String, PromptReport) {
        let mut pack = Pack::new(PromptKind::Chat);
        pack.text(CHAT_PREAMBLE);
        pack.block("ai", &persona_line(profile));
        pack.block("user", &user_line(profile));
        pack.history(Some("Current conversation:"), history);
        pack.block("query", query);
        pack.text(CHAT_INSTRUCTIONS);
        pack.finish()
    }

    /// Prompt asking the AI to introduce itself to the child.
    pub fn compose_introduction(&self, profile: &Profile, history: &str) -> (String, PromptReport) {
        let mut pack = Pack::new(PromptKind::Introduction);
        pack.text(INTRO_PREAMBLE);
        pack.block("ai-info", &persona_line(profile));
        pack.block("user", &user_line(profile));
        pack.history(None, history);
        pack.text(INTRO_INSTRUCTIONS);
        pack.finish()
    }
}

// ── assembly ─────────────────────────────────────────────────────────

/// Paragraphs joined by blank lines, with a block report per tag.
struct Pack {
    kind: PromptKind,
    out: String,
    blocks: Vec<BlockReport>,
    history_chars: usize,
}

impl Pack {
    fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            out: String::new(),
            blocks: Vec::new(),
            history_chars: 0,
        }
    }

    fn text(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push_str("\n\n");
        }
        self.out.push_str(text);
    }

    fn block(&mut self, tag: &str, body: &str) {
        self.text(&format_block(tag, body));
        self.record(tag, body);
    }

    fn record(&mut self, tag: &str, body: &str) {
        self.blocks.push(BlockReport {
            tag: tag.to_owned(),
            chars: body.len(),
        });
    }

    /// History block, optionally headed by a label line.
    fn history(&mut self, label: Option<&str>, history: &str) {
        self.history_chars = history.len();
        let block = format_block("history", history);
        match label {
            Some(label) => self.text(&format!("{label}\n{block}")),
            None => self.text(&block),
        }
        self.record("history", history);
    }

    fn finish(mut self) -> (String, PromptReport) {
        self.out.push('\n');
        let report = PromptReport {
            kind: self.kind,
            blocks: self.blocks,
            history_chars: self.history_chars,
            total_chars: self.out.len(),
        };
        (self.out, report)
    }
}
