//! Image embeds: `![[diagram v1.png]]` to `![diagram-v1.png](/img/diagram-v1.png)`.

use super::{find_spans, splice, ContentLink, LinkPattern, RewriteError};
use crate::models::AssetCopyRequest;
use crate::sanitize::sanitize;

/// Split the first image embed in `text` into `(base_name, extension)`.
///
/// The extension keeps its leading dot.
pub fn parse_embed(text: &str) -> Option<(&str, &str)> {
    let caps = LinkPattern::ImageEmbed.regex().captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Site path of a sanitized image under `prefix`
pub fn image_url(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), name)
}

fn rewrite_embed(
    link: &ContentLink<'_>,
    prefix: &str,
) -> Result<(String, AssetCopyRequest), RewriteError> {
    let (base, ext) =
        parse_embed(link.text).ok_or_else(|| RewriteError::MalformedEmbed(link.text.to_string()))?;

    let source_name = format!("{base}{ext}");
    let name = sanitize(&source_name);
    let markup = format!("![{}]({})", name, image_url(prefix, &name));

    Ok((
        markup,
        AssetCopyRequest {
            source_name,
            destination_name: name,
        },
    ))
}

/// Rewrite every image embed in `text`.
///
/// Returns the new text and one copy request per distinct source image, in
/// the order they first appear.
pub fn rewrite_images(
    text: &str,
    prefix: &str,
) -> Result<(String, Vec<AssetCopyRequest>), RewriteError> {
    let spans = find_spans(text, LinkPattern::ImageEmbed);
    let mut assets: Vec<AssetCopyRequest> = Vec::new();

    let rewritten = splice::<RewriteError, _>(text, &spans, |span| {
        let (markup, request) = rewrite_embed(span, prefix)?;
        if !assets.iter().any(|a| a.source_name == request.source_name) {
            assets.push(request);
        }
        Ok(markup)
    })?;

    Ok((rewritten, assets))
}
