//! Rebuilds a speaker-attributed transcript from the flat word list a
//! diarizing recognizer returns.
//!
//! Two folds over the input:
//!
//! 1. **Segmentation** groups consecutive words by resolved speaker tag.
//!    Untagged words inherit the last explicit tag seen, or speaker `1` when
//!    none has appeared yet. Segments whose text is blank are dropped.
//! 2. **Short-segment merge** prepends an utterance of fewer than three
//!    tokens onto the following utterance when both belong to the same
//!    speaker. The merged result is itself compared against its successor,
//!    so a run of short fragments collapses left to right.
//!
//! Timing is kept only for the merge step: a merged utterance inherits the
//! earlier `start_time` when it has none of its own. `end_time` is never
//! propagated and neither field is serialized.

use serde::{Deserialize, Serialize};

/// Speaker assumed for leading words that carry no tag.
pub const DEFAULT_SPEAKER_TAG: i64 = 1;

/// Utterances with fewer whitespace-separated tokens than this are merge
/// candidates.
const SHORT_UTTERANCE_TOKENS: usize = 3;

/// One recognized word. Times are the recognizer's own duration strings
/// (e.g. `"1.500s"`) and are only ever copied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub speaker_tag: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl Word {
    pub fn new(text: impl Into<String>, speaker_tag: Option<i64>) -> Self {
        Self {
            text: text.into(),
            speaker_tag,
            ..Self::default()
        }
    }

    pub fn with_times(mut self, start_time: Option<&str>, end_time: Option<&str>) -> Self {
        self.start_time = start_time.map(str::to_string);
        self.end_time = end_time.map(str::to_string);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub transcript: String,
    #[serde(skip)]
    pub start_time: Option<String>,
    #[serde(skip)]
    pub end_time: Option<String>,
}

impl Utterance {
    pub fn token_count(&self) -> usize {
        self.transcript.split_whitespace().count()
    }

    fn is_short(&self) -> bool {
        self.token_count() < SHORT_UTTERANCE_TOKENS
    }

    fn prepend_to(self, mut next: Utterance) -> Utterance {
        next.transcript = format!("{} {}", self.transcript, next.transcript);
        if next.start_time.is_none() {
            next.start_time = self.start_time;
        }
        next
    }
}

pub fn speaker_label(tag: i64) -> String {
    format!("Speaker {tag}")
}

/// Builds the ordered utterance list for `words`. Total: empty input yields
/// an empty transcript.
pub fn build_transcript(words: &[Word]) -> Vec<Utterance> {
    merge_short_utterances(segment_words(words))
}

/// Pairs every word with its resolved speaker tag.
fn resolve_tags(words: &[Word]) -> impl Iterator<Item = (i64, &Word)> {
    words.iter().scan(None, |last_known: &mut Option<i64>, word| {
        if word.speaker_tag.is_some() {
            *last_known = word.speaker_tag;
        }
        Some((last_known.unwrap_or(DEFAULT_SPEAKER_TAG), word))
    })
}

struct Segment<'a> {
    speaker_tag: i64,
    words: Vec<&'a str>,
    start_time: Option<String>,
    end_time: Option<String>,
}

impl<'a> Segment<'a> {
    fn open(speaker_tag: i64, word: &'a Word) -> Self {
        Self {
            speaker_tag,
            words: vec![word.text.as_str()],
            start_time: word.start_time.clone(),
            end_time: word.end_time.clone(),
        }
    }

    fn push(&mut self, word: &'a Word) {
        self.words.push(word.text.as_str());
        if word.end_time.is_some() {
            self.end_time = word.end_time.clone();
        }
    }

    fn close(self) -> Option<Utterance> {
        let transcript = self
            .words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            return None;
        }

        Some(Utterance {
            speaker: speaker_label(self.speaker_tag),
            transcript,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

fn segment_words(words: &[Word]) -> Vec<Utterance> {
    let (open, mut emitted) = resolve_tags(words).fold(
        (None::<Segment>, Vec::new()),
        |(current, mut emitted), (tag, word)| {
            let current = match current {
                Some(mut segment) if segment.speaker_tag == tag => {
                    segment.push(word);
                    segment
                }
                Some(segment) => {
                    emitted.extend(segment.close());
                    Segment::open(tag, word)
                }
                None => Segment::open(tag, word),
            };
            (Some(current), emitted)
        },
    );

    emitted.extend(open.and_then(Segment::close));
    emitted
}

fn merge_short_utterances(utterances: Vec<Utterance>) -> Vec<Utterance> {
    let (pending, mut merged) = utterances.into_iter().fold(
        (None::<Utterance>, Vec::new()),
        |(pending, mut merged), next| {
            let carried = match pending {
                Some(current) if current.is_short() && current.speaker == next.speaker => {
                    current.prepend_to(next)
                }
                Some(current) => {
                    merged.push(current);
                    next
                }
                None => next,
            };
            (Some(carried), merged)
        },
    );

    merged.extend(pending);
    merged
}
