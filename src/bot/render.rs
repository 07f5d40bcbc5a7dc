//! Turning packed documents into embeds and warnings.

use crate::core::packer::{Document, QuestionRecord};
use poise::serenity_prelude as serenity;

const ANSWER_COLOUR: u32 = 0x0034_98DB;

/// Builds the embed for one document.
///
/// The thumbnail is the document's avatar override, else `fallback_avatar`.
#[must_use]
pub fn document_embed(document: &Document, fallback_avatar: Option<&str>) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::default()
        .title(document.title())
        .color(ANSWER_COLOUR)
        .author(serenity::CreateEmbedAuthor::new(document.author_line()))
        .fields(
            document
                .blocks
                .iter()
                .map(|block| (block.name.clone(), block.body.clone(), false)),
        );

    match document.avatar_url.as_deref().or(fallback_avatar) {
        Some(url) => embed.thumbnail(url),
        None => embed,
    }
}

/// Plain-text notice for a question too long to post automatically.
#[must_use]
pub fn rejection_message(record: &QuestionRecord) -> String {
    format!(
        "⚠️ Question #{} from **{}** is too long to post automatically. \
         <@{}>, please split it up and post the question and answer manually.",
        record.number, record.asker.name, record.asker.id
    )
}
