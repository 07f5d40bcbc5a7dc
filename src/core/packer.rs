//! Packs answered questions into embed-sized documents.
//!
//! Records are consumed in order and grouped into documents by consecutive
//! asker: a later record from an asker seen earlier still starts a new
//! document if someone else asked in between. Each record becomes one field
//! (`Question #N`) when it is short enough, otherwise a run of numbered
//! question and answer fields. Documents are produced lazily as soon as they
//! are sealed; records that cannot fit even an empty document come back as
//! [`Packed::RecordRejected`] so the caller can ask for a manual post.

use crate::{
    core::text,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};

/// Size ceilings used while packing, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackerLimits {
    /// Total size of a document, header included. Discord's hard limit is 6000.
    pub max_doc_length: usize,
    /// Size of a field holding a whole question, and soft size of question chunks.
    pub max_block_length: usize,
    /// Soft size of answer chunks.
    pub max_answer_chunk_length: usize,
    /// Raw question plus answer length above which a record is always rejected.
    pub max_record_length: usize,
}

impl Default for PackerLimits {
    fn default() -> Self {
        Self {
            max_doc_length: 4800,
            max_block_length: 900,
            max_answer_chunk_length: 950,
            max_record_length: 4700,
        }
    }
}

/// A Discord user as seen by the packer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Discord user id
    pub id: String,
    /// Name shown in the embed
    pub name: String,
}

impl Participant {
    /// Creates a participant from any id type.
    pub fn new(id: impl ToString, name: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            name: name.into(),
        }
    }
}

/// One answered question ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// 1-based sequence number within the interview round
    pub number: u32,
    /// Who asked
    pub asker: Participant,
    /// Raw question text
    pub question: String,
    /// Raw answer text
    pub answer: String,
    /// Jump link to the message the question was asked in
    pub link: String,
    /// When the question was asked
    pub asked_at: DateTime<Utc>,
}

impl QuestionRecord {
    fn raw_len(&self) -> usize {
        text::char_len(&self.question) + text::char_len(&self.answer)
    }
}

/// A named chunk of a document; maps to an embed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Field name, e.g. `Question #3` or `Answer #3 [2/4]`
    pub name: String,
    /// Field value
    pub body: String,
}

impl Block {
    /// Characters counted against the document ceiling.
    #[must_use]
    pub fn len(&self) -> usize {
        text::char_len(&self.name) + text::char_len(&self.body)
    }

    /// True when both name and body are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.body.is_empty()
    }
}

/// One embed's worth of answers from a single asker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Whose interview this is
    pub interviewee: Participant,
    /// Who asked every question in this document
    pub asker: Participant,
    /// Thumbnail override; the renderer falls back to the interviewee's avatar
    pub avatar_url: Option<String>,
    /// Fields in posting order
    pub blocks: Vec<Block>,
    /// Question numbers laid out in `blocks`, in order
    pub numbers: Vec<u32>,
    /// Header plus block lengths
    pub length: usize,
}

impl Document {
    fn new(interviewee: &Participant, asker: &Participant, avatar_url: Option<&str>) -> Self {
        let mut document = Self {
            interviewee: interviewee.clone(),
            asker: asker.clone(),
            avatar_url: avatar_url.map(str::to_string),
            blocks: Vec::new(),
            numbers: Vec::new(),
            length: 0,
        };
        document.length = text::char_len(&document.title()) + text::char_len(&document.author_line());
        document
    }

    /// Embed title.
    #[must_use]
    pub fn title(&self) -> String {
        format!("**{}**'s interview", self.interviewee.name)
    }

    /// Embed author line.
    #[must_use]
    pub fn author_line(&self) -> String {
        format!("Asked by {}", self.asker.name)
    }

    /// True when no blocks have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn fits(&self, blocks_len: usize, limits: &PackerLimits) -> bool {
        self.length + blocks_len <= limits.max_doc_length
    }

    fn push_all(&mut self, number: u32, blocks: Vec<Block>, blocks_len: usize) {
        self.numbers.push(number);
        self.blocks.extend(blocks);
        self.length += blocks_len;
    }
}

/// Output of the packer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packed {
    /// A sealed document with at least one block
    DocumentReady(Document),
    /// A record too large to post; it appears in no document
    RecordRejected(QuestionRecord),
}

/// Lays out one record as fields.
#[must_use]
pub fn record_blocks(record: &QuestionRecord, limits: &PackerLimits) -> Vec<Block> {
    let num = record.number;
    let whole = Block {
        name: format!("Question #{num}"),
        body: text::whole_body(&record.question, &record.link, &record.answer),
    };
    if whole.len() <= limits.max_block_length {
        return vec![whole];
    }

    let questions = text::question_chunks(&record.question, &record.link, limits.max_block_length);
    let answers = text::answer_chunks(&record.answer, limits.max_answer_chunk_length);
    numbered("Question", num, questions)
        .chain(numbered("Answer", num, answers))
        .collect()
}

fn numbered(label: &'static str, num: u32, chunks: Vec<String>) -> impl Iterator<Item = Block> {
    let total = chunks.len();
    chunks.into_iter().enumerate().map(move |(i, body)| {
        let name = if total == 1 {
            format!("{label} #{num}")
        } else {
            format!("{label} #{num} [{}/{total}]", i + 1)
        };
        Block { name, body }
    })
}

/// Lazily packs `records` into documents for `interviewee`.
///
/// Malformed input (empty asker id, sequence number 0, a repeated sequence
/// number) yields one [`Error::InvalidInput`] and ends the iteration.
pub fn pack<I>(
    interviewee: Participant,
    records: I,
    avatar_url: Option<String>,
    limits: PackerLimits,
) -> Packer<I::IntoIter>
where
    I: IntoIterator<Item = QuestionRecord>,
{
    Packer {
        records: records.into_iter(),
        interviewee,
        avatar_url,
        limits,
        current: None,
        ready: VecDeque::new(),
        seen: HashSet::new(),
        done: false,
    }
}

/// Iterator returned by [`pack`].
#[derive(Debug)]
pub struct Packer<I> {
    records: I,
    interviewee: Participant,
    avatar_url: Option<String>,
    limits: PackerLimits,
    current: Option<Document>,
    ready: VecDeque<Packed>,
    seen: HashSet<u32>,
    done: bool,
}

impl<I> Packer<I>
where
    I: Iterator<Item = QuestionRecord>,
{
    fn validate(&mut self, record: &QuestionRecord) -> Result<()> {
        if record.asker.id.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: format!("question #{} has no asker", record.number),
            });
        }
        if record.number == 0 {
            return Err(Error::InvalidInput {
                message: "question numbers start at 1".to_string(),
            });
        }
        if !self.seen.insert(record.number) {
            return Err(Error::InvalidInput {
                message: format!("question #{} appears more than once", record.number),
            });
        }
        Ok(())
    }

    fn seal(&mut self) {
        if let Some(document) = self.current.take().filter(|d| !d.is_empty()) {
            self.ready.push_back(Packed::DocumentReady(document));
        }
    }

    fn fresh(&self, asker: &Participant) -> Document {
        Document::new(&self.interviewee, asker, self.avatar_url.as_deref())
    }

    fn place(&mut self, record: QuestionRecord) {
        let same_asker = self
            .current
            .as_ref()
            .is_some_and(|d| d.asker.id == record.asker.id);
        if !same_asker {
            self.seal();
            self.current = Some(self.fresh(&record.asker));
        }

        if record.raw_len() > self.limits.max_record_length {
            tracing::debug!(number = record.number, "question exceeds record ceiling");
            self.ready.push_back(Packed::RecordRejected(record));
            return;
        }

        let blocks = record_blocks(&record, &self.limits);
        let blocks_len = blocks.iter().map(Block::len).sum();

        let mut document = self.current.take().unwrap_or_else(|| self.fresh(&record.asker));
        if !document.fits(blocks_len, &self.limits) && !document.is_empty() {
            self.ready.push_back(Packed::DocumentReady(document));
            document = self.fresh(&record.asker);
        }
        if document.fits(blocks_len, &self.limits) {
            document.push_all(record.number, blocks, blocks_len);
        } else {
            tracing::debug!(number = record.number, "question does not fit an empty document");
            self.ready.push_back(Packed::RecordRejected(record));
        }
        self.current = Some(document);
    }
}

impl<I> Iterator for Packer<I>
where
    I: Iterator<Item = QuestionRecord>,
{
    type Item = Result<Packed>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(packed) = self.ready.pop_front() {
                return Some(Ok(packed));
            }
            if self.done {
                return None;
            }
            let Some(record) = self.records.next() else {
                self.done = true;
                self.seal();
                continue;
            };
            if let Err(e) = self.validate(&record) {
                self.done = true;
                self.ready.clear();
                self.current = None;
                return Some(Err(e));
            }
            self.place(record);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn asker(id: &str) -> Participant {
        Participant::new(id, format!("user-{id}"))
    }

    fn record(number: u32, asker_id: &str, question: &str, answer: &str) -> QuestionRecord {
        QuestionRecord {
            number,
            asker: asker(asker_id),
            question: question.to_string(),
            answer: answer.to_string(),
            link: text::message_link(1, 2, number),
            asked_at: Utc::now(),
        }
    }

    fn run(records: Vec<QuestionRecord>) -> Vec<Packed> {
        pack(asker("iv"), records, None, PackerLimits::default())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn documents(output: &[Packed]) -> Vec<&Document> {
        output
            .iter()
            .filter_map(|p| match p {
                Packed::DocumentReady(d) => Some(d),
                Packed::RecordRejected(_) => None,
            })
            .collect()
    }

    fn rejected(output: &[Packed]) -> Vec<u32> {
        output
            .iter()
            .filter_map(|p| match p {
                Packed::RecordRejected(r) => Some(r.number),
                Packed::DocumentReady(_) => None,
            })
            .collect()
    }

    /// Question numbers mentioned in a document's block names, in order, deduplicated.
    fn numbers_in(document: &Document) -> Vec<u32> {
        let mut numbers: Vec<u32> = Vec::new();
        for block in &document.blocks {
            let n = block
                .name
                .split('#')
                .nth(1)
                .and_then(|rest| rest.split(' ').next())
                .and_then(|n| n.parse().ok())
                .unwrap();
            if numbers.last() != Some(&n) {
                numbers.push(n);
            }
        }
        numbers
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(run(Vec::new()).is_empty());
    }

    #[test]
    fn test_groups_consecutive_askers() {
        let output = run(vec![
            record(1, "a", "What's your favorite color?", "Blue"),
            record(2, "a", "Favorite food?", "Pizza"),
            record(3, "a", "Cats or dogs?", "Cats"),
            record(4, "b", "Where are you from?", "Here"),
            record(5, "b", "Why?", "Because"),
        ]);

        let docs = documents(&output);
        assert_eq!(docs.len(), 2);
        assert!(rejected(&output).is_empty());
        assert_eq!(docs[0].asker.id, "a");
        assert_eq!(docs[0].blocks.len(), 3);
        assert_eq!(docs[1].asker.id, "b");
        assert_eq!(docs[1].blocks.len(), 2);
        assert_eq!(docs[0].blocks[0].name, "Question #1");
        assert_eq!(
            docs[0].blocks[0].body,
            format!("[> What's your favorite color?]({})\nBlue", text::message_link(1, 2, 1))
        );
    }

    #[test]
    fn test_returning_asker_starts_new_document() {
        let output = run(vec![
            record(1, "a", "q1", "a1"),
            record(2, "b", "q2", "a2"),
            record(3, "a", "q3", "a3"),
        ]);
        let docs = documents(&output);
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs.iter().map(|d| d.asker.id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "a"]
        );
    }

    #[test]
    fn test_oversized_question_is_rejected() {
        let output = run(vec![record(1, "a", &"x".repeat(6000), "ok")]);
        assert_eq!(rejected(&output), vec![1]);
        assert!(documents(&output).is_empty());
    }

    #[test]
    fn test_rejection_keeps_current_document() {
        let output = run(vec![
            record(1, "a", "short", "short"),
            record(2, "a", &"x ".repeat(2500), "too long"),
            record(3, "a", "short again", "fine"),
        ]);
        assert_eq!(rejected(&output), vec![2]);
        let docs = documents(&output);
        assert_eq!(docs.len(), 1);
        assert_eq!(numbers_in(docs[0]), vec![1, 3]);
    }

    #[test]
    fn test_record_too_big_for_empty_document_is_rejected_after_retry() {
        // Under the raw record ceiling, but the laid-out blocks outgrow an empty document.
        let question = "qq ".repeat(780);
        let answer = "aa ".repeat(780);
        let big = record(2, "a", &question, &answer);
        assert!(big.raw_len() <= PackerLimits::default().max_record_length);

        let alone = run(vec![big.clone()]);
        assert_eq!(rejected(&alone), vec![2]);
        assert!(documents(&alone).is_empty());

        let output = run(vec![
            record(1, "a", "short", "short"),
            big,
            record(3, "a", "short again", "fine"),
        ]);
        assert_eq!(rejected(&output), vec![2]);
        let docs = documents(&output);
        assert!(docs.iter().all(|d| !d.numbers.contains(&2)));
        assert_eq!(
            docs.iter().map(|d| d.numbers.clone()).collect::<Vec<_>>(),
            vec![vec![1], vec![3]]
        );
    }

    #[test]
    fn test_long_url_answer_stays_within_field_limit() {
        let url = format!("https://example.com/{}", "a".repeat(100));
        let answer = format!("{} {url}", "word ".repeat(190).trim_end());
        let question = format!("{} {url}", "why ".repeat(240).trim_end());
        let output = run(vec![record(1, "a", &question, &answer)]);

        let docs = documents(&output);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].blocks.len() > 2);
        for block in &docs[0].blocks {
            assert!(
                text::char_len(&block.body) <= text::FIELD_VALUE_LIMIT,
                "{} is {} characters",
                block.name,
                text::char_len(&block.body)
            );
        }
    }

    #[test]
    fn test_large_record_is_split_and_reconstructs() {
        let question = "why is the sky [blue] ".repeat(70);
        let answer = "because of scattering ".repeat(66);
        let original = record(7, "a", question.trim_end(), answer.trim_end());
        assert!(original.raw_len() > 2900 && original.raw_len() < 3100);

        let output = run(vec![original.clone()]);
        let docs = documents(&output);
        assert_eq!(docs.len(), 1);
        assert!(rejected(&output).is_empty());

        let blocks = &docs[0].blocks;
        let question_blocks: Vec<&Block> =
            blocks.iter().filter(|b| b.name.starts_with("Question")).collect();
        let answer_blocks: Vec<&Block> =
            blocks.iter().filter(|b| b.name.starts_with("Answer")).collect();
        assert!(question_blocks.len() > 1);
        assert!(answer_blocks.len() > 1);
        assert_eq!(question_blocks[0].name, format!("Question #7 [1/{}]", question_blocks.len()));
        assert_eq!(answer_blocks[0].name, format!("Answer #7 [1/{}]", answer_blocks.len()));

        let suffix = format!("]({})", original.link);
        let rebuilt_question = question_blocks
            .iter()
            .map(|b| {
                b.body
                    .strip_prefix("[> ")
                    .and_then(|body| body.strip_suffix(&suffix))
                    .unwrap()
            })
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt_question, text::escape_markup(&original.question));

        let rebuilt_answer = answer_blocks
            .iter()
            .map(|b| b.body.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rebuilt_answer, original.answer);
    }

    #[test]
    fn test_full_document_rolls_over_for_same_asker() {
        // Each record lays out to ~2500 characters, so none can share a document.
        let long = "lorem ".repeat(200);
        let records: Vec<QuestionRecord> = (1..=5)
            .map(|n| record(n, "a", long.trim_end(), long.trim_end()))
            .collect();
        let output = run(records);
        let docs = documents(&output);
        assert!(rejected(&output).is_empty());
        assert!(docs.iter().all(|d| d.asker.id == "a"));

        assert_eq!(docs.len(), 5);
        let order: Vec<u32> = docs.iter().flat_map(|d| numbers_in(d)).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
        assert!(docs.iter().all(|d| numbers_in(d) == d.numbers));
    }

    #[test]
    fn test_every_document_respects_ceilings() {
        let limits = PackerLimits::default();
        let mut records = Vec::new();
        for n in 1..=30_u32 {
            let asker_id = if (n / 4) % 2 == 0 { "a" } else { "b" };
            let words = (n as usize * 37) % 400 + 1;
            records.push(record(n, asker_id, &"why ".repeat(words), &"yes ".repeat(words * 2)));
        }
        let output = run(records);

        let mut seen = Vec::new();
        for document in documents(&output) {
            assert!(!document.is_empty());
            let header = text::char_len(&document.title()) + text::char_len(&document.author_line());
            let total: usize = header + document.blocks.iter().map(Block::len).sum::<usize>();
            assert_eq!(total, document.length);
            assert!(total <= limits.max_doc_length);
            for block in &document.blocks {
                if block.body.contains(")\n") {
                    assert!(block.len() <= limits.max_block_length);
                }
                assert!(text::char_len(&block.body) < 1024);
            }
            seen.extend(numbers_in(document));
        }
        seen.extend(rejected(&output));
        seen.sort_unstable();
        assert_eq!(seen, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_number_is_invalid_input() {
        let mut packer = pack(
            asker("iv"),
            vec![record(1, "a", "q", "a"), record(1, "a", "q", "a")],
            None,
            PackerLimits::default(),
        );
        assert!(matches!(packer.next(), Some(Err(Error::InvalidInput { .. }))));
        assert!(packer.next().is_none());
    }

    #[test]
    fn test_missing_asker_and_zero_number_are_invalid() {
        let mut no_asker = record(1, "a", "q", "a");
        no_asker.asker.id = String::new();
        let result: Result<Vec<_>> =
            pack(asker("iv"), vec![no_asker], None, PackerLimits::default()).collect();
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result: Result<Vec<_>> = pack(
            asker("iv"),
            vec![record(0, "a", "q", "a")],
            None,
            PackerLimits::default(),
        )
        .collect();
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_documents_are_lazy() {
        let records = (1..=3).map(|n| record(n, if n == 1 { "a" } else { "b" }, "q", "a"));
        let mut packer = pack(asker("iv"), records, Some("https://img".to_string()), PackerLimits::default());
        let Some(Ok(Packed::DocumentReady(first))) = packer.next() else {
            panic!("expected first document");
        };
        assert_eq!(first.asker.id, "a");
        assert_eq!(first.avatar_url.as_deref(), Some("https://img"));
        assert!(packer.next().is_some());
        assert!(packer.next().is_none());
    }
}
