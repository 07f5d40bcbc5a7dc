//! Random picture commands backed by image-host albums.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::helpers::Context, core::album, errors::Result};

    async fn post_album_image(ctx: Context<'_>, albums: &[String], key: Option<String>) -> Result<()> {
        let Some(imgur) = ctx.data().imgur.as_ref() else {
            ctx.say("Imgur not enabled.").await?;
            return Ok(());
        };

        let images = imgur.images_from(albums).await?;
        let link = {
            let mut rng = rand::thread_rng();
            album::choose_image(&images, key.as_deref(), &mut rng).map(|image| image.link.clone())
        };

        match link {
            Some(link) => ctx.say(link).await?,
            None => ctx.say("No images found.").await?,
        };
        Ok(())
    }

    /// Posts a random Bidoof.
    #[poise::command(slash_command, prefix_command)]
    pub async fn bidoof(
        ctx: Context<'_>,
        #[description = "Picture caption to look for"] key: Option<String>,
    ) -> Result<()> {
        let albums = ctx.data().settings.albums.bidoof.clone();
        post_album_image(ctx, &albums, key).await
    }

    /// Posts a random sad cat.
    #[poise::command(slash_command, prefix_command)]
    pub async fn sadcat(
        ctx: Context<'_>,
        #[description = "Picture caption to look for"] key: Option<String>,
    ) -> Result<()> {
        let albums = ctx.data().settings.albums.sadcat.clone();
        post_album_image(ctx, &albums, key).await
    }
}

// Re-export all commands
pub use inner::*;
