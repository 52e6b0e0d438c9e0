//! Directive classification and timeline assembly.
//!
//! # Grammar
//!
//! Rules are tried in a fixed order and the first match wins. Several
//! shapes overlap textually (`rate` vs `R`, `P` vs `point`, a lone number
//! vs the number inside `48→60`), so the order is part of the contract.
//!
//! | # | rule           | shape                    | effect                          |
//! |---|----------------|--------------------------|---------------------------------|
//! | 1 | `moment`       | `15`, `1:10`             | flush, open moment (last: pause)|
//! | 2 | `goto`         | `→60.5`                  | `goto:60.5`                     |
//! | 3 | `moment_goto`  | `48→60.5`                | emit `[60.5, "goto:60.5"]`      |
//! | 4 | `faster`       | `F2`, `F2M`              | `rate:1.2` (+ mute/unmute)      |
//! | 5 | `rate_short`   | `R2`, `R4M`              | `rate:2` (+ mute/unmute)        |
//! | 6 | `rate`         | `rate 2`, `rate2`        | `rate:2`                        |
//! | 7 | `keyword`      | `mute` `unmute` `M` `U` `pause` | the keyword             |
//! | 8 | `point`        | `point:[0,0,2]`          | verbatim                        |
//! | 9 | `play`         | `P`                      | `rate:1`, `unmute`              |
//! |10 | `todo`         | `TODO ...`               | warning, skipped                |

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::CompileError;
use crate::time::{normalize, Moment};
use crate::token::{Timeline, TimelineEvent, Token};

/// A time value: seconds, optional `min:` prefix, optional fraction.
const NUM: &str = r"\d+(?::\d+)?(?:\.\d+)?";

type Handler = fn(&mut Compiler<'_>, &Captures<'_>) -> Result<(), CompileError>;

/// One entry of the ordered rule table.
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    handler: Handler,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, handler: Handler) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("directive rule regex should compile"),
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this rule would accept the directive on its own.
    pub fn matches(&self, directive: &str) -> bool {
        self.pattern.is_match(directive)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// The rule table in priority order.
pub fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            Rule::new("moment", &format!(r"^({NUM})$"), open_moment),
            Rule::new("goto", &format!(r"^→({NUM})$"), append_goto),
            Rule::new("moment_goto", &format!(r"^({NUM})→({NUM})"), emit_moment_goto),
            Rule::new("faster", r"^F(\d+)(M|U)?", append_faster),
            Rule::new("rate_short", &format!(r"^R({NUM})(M|U)?"), append_rate_short),
            Rule::new("rate", &format!(r"^rate\s*({NUM})"), append_rate),
            Rule::new("keyword", r"^(mute|unmute|M|U|pause)$", append_keyword),
            Rule::new("point", r"^point", append_point),
            Rule::new("play", r"^P$", append_play),
            Rule::new("todo", r"^TODO", skip_todo),
        ]
    })
}

/// Name of the first rule accepting `directive`, if any.
pub fn classify(directive: &str) -> Option<&'static str> {
    rules()
        .iter()
        .find(|rule| rule.matches(directive))
        .map(Rule::name)
}

/// Compile atomic directives into a timeline.
pub fn compile(directives: &[String]) -> Result<Timeline, CompileError> {
    let mut compiler = Compiler::new(directives);

    for (index, directive) in directives.iter().enumerate() {
        compiler.index = index;

        let Some((rule, captures)) = rules().iter().find_map(|rule| {
            rule.pattern
                .captures(directive)
                .map(|captures| (rule, captures))
        }) else {
            return Err(CompileError::UnknownDirective {
                directive: directive.clone(),
                directives: directives.to_vec(),
            });
        };

        tracing::trace!(directive = %directive, rule = rule.name, "Matched directive");
        (rule.handler)(&mut compiler, &captures)?;
    }

    Ok(compiler.finish())
}

/// The open moment and the actions collected for it.
#[derive(Debug, Default)]
struct Accumulator {
    moment: Option<Moment>,
    tokens: Vec<Token>,
}

impl Accumulator {
    fn is_open(&self) -> bool {
        self.moment.is_some() || !self.tokens.is_empty()
    }

    fn open(&mut self, moment: Moment) {
        self.moment = Some(moment);
        self.tokens.clear();
    }

    fn append(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Take the collected actions as an event. `None` when nothing was collected.
    fn flush(&mut self) -> Option<TimelineEvent> {
        if self.tokens.is_empty() {
            return None;
        }
        let moment = self.moment.clone().unwrap_or_else(Moment::zero);
        Some(TimelineEvent::new(moment, std::mem::take(&mut self.tokens)))
    }
}

struct Compiler<'a> {
    directives: &'a [String],
    index: usize,
    acc: Accumulator,
    events: Vec<TimelineEvent>,
}

impl<'a> Compiler<'a> {
    fn new(directives: &'a [String]) -> Self {
        Self {
            directives,
            index: 0,
            acc: Accumulator::default(),
            events: Vec::new(),
        }
    }

    fn directive(&self) -> &'a str {
        &self.directives[self.index]
    }

    fn is_last(&self) -> bool {
        self.index + 1 == self.directives.len()
    }

    fn append_with_flag(&mut self, token: Token, flag: Option<regex::Match<'_>>) {
        self.acc.append(token);
        if let Some(flag) = flag.and_then(|m| Token::from_audio_flag(m.as_str())) {
            self.acc.append(flag);
        }
    }

    fn finish(mut self) -> Timeline {
        if let Some(event) = self.acc.flush() {
            self.events.push(event);
        }
        Timeline {
            events: self.events,
        }
    }
}

fn open_moment(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    if c.acc.is_open() {
        let event = c.acc.flush().ok_or_else(|| CompileError::DanglingMoment {
            directive: c.directive().to_string(),
            directives: c.directives.to_vec(),
        })?;
        c.events.push(event);
    }

    let moment = normalize(&caps[1]);
    c.acc.open(moment.clone());

    // A trailing lone number is the end of playback.
    if c.is_last() {
        c.events.push(TimelineEvent::new(moment, vec![Token::Pause]));
    }
    Ok(())
}

fn append_goto(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    c.acc.append(Token::goto(normalize(&caps[1])));
    Ok(())
}

fn emit_moment_goto(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    if let Some(moment) = &c.acc.moment {
        return Err(CompileError::MomentConflict {
            moment: moment.to_string(),
            directive: c.directive().to_string(),
            directives: c.directives.to_vec(),
        });
    }

    // The source time is documentation only; the event sits at the target.
    let target = normalize(&caps[2]);
    c.events
        .push(TimelineEvent::new(target.clone(), vec![Token::goto(target)]));
    Ok(())
}

fn append_faster(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    c.append_with_flag(Token::rate(format!("1.{}", &caps[1])), caps.get(2));
    Ok(())
}

fn append_rate_short(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    c.append_with_flag(Token::rate(&caps[1]), caps.get(2));
    Ok(())
}

fn append_rate(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    c.acc.append(Token::rate(&caps[1]));
    Ok(())
}

fn append_keyword(c: &mut Compiler<'_>, caps: &Captures<'_>) -> Result<(), CompileError> {
    let token = Token::from_audio_flag(&caps[1]).unwrap_or(Token::Pause);
    c.acc.append(token);
    Ok(())
}

fn append_point(c: &mut Compiler<'_>, _caps: &Captures<'_>) -> Result<(), CompileError> {
    c.acc.append(Token::Point(c.directive().to_string()));
    Ok(())
}

fn append_play(c: &mut Compiler<'_>, _caps: &Captures<'_>) -> Result<(), CompileError> {
    c.acc.append(Token::rate("1"));
    c.acc.append(Token::Unmute);
    Ok(())
}

fn skip_todo(c: &mut Compiler<'_>, _caps: &Captures<'_>) -> Result<(), CompileError> {
    tracing::warn!(directive = c.directive(), "Skipping TODO directive");
    Ok(())
}
