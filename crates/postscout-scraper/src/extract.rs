//! Per-field extraction from a rendered post.
//!
//! Each extractor reads one field and is wrapped in [`attempt`], so a broken
//! selector or a detached node degrades that single field to its fallback
//! instead of losing the post. Extractors only read from the page.

use std::future::Future;

use postscout_core::{PostRecord, TIME_FALLBACK};

use crate::driver::PostElement;
use crate::error::DriverError;
use crate::identity::resolve_identity;
use crate::normalize::{
    find_hashtags, find_links, normalize_post_text, parse_comment_count, parse_reaction_count,
};
use crate::selectors;

/// Runs `operation`, substituting `fallback` if it fails.
///
/// The failure is logged at debug level only; a missing field is routine.
pub async fn attempt<T, Fut>(field: &'static str, fallback: T, operation: Fut) -> T
where
    Fut: Future<Output = Result<T, DriverError>>,
{
    match operation.await {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(field, error = %err, "field extraction fell back to default");
            fallback
        }
    }
}

/// Builds a complete [`PostRecord`] from one rendered post.
pub async fn extract_post<E: PostElement>(post: &E) -> PostRecord {
    PostRecord {
        id: resolve_identity(post).await,
        author: author(post).await,
        time: time(post).await,
        text: text(post).await,
        tags: tags(post).await,
        links: links(post).await,
        reactions: reactions(post).await,
        comments: comments(post).await,
    }
}

/// Profile link of the post's author. Fallback: `""`.
pub async fn author<E: PostElement>(post: &E) -> String {
    attempt("author", String::new(), read_author(post)).await
}

/// Rendered timestamp text. Fallback: [`TIME_FALLBACK`].
pub async fn time<E: PostElement>(post: &E) -> String {
    attempt("time", TIME_FALLBACK.to_owned(), read_time(post)).await
}

/// Normalized post body. Fallback: `""`.
pub async fn text<E: PostElement>(post: &E) -> String {
    attempt("text", String::new(), read_text(post)).await
}

/// Hashtags anywhere in the post's visible text. Fallback: empty.
pub async fn tags<E: PostElement>(post: &E) -> Vec<String> {
    attempt("tags", Vec::new(), read_tags(post)).await
}

/// HTTP(S) URLs anywhere in the post's visible text. Fallback: empty.
pub async fn links<E: PostElement>(post: &E) -> Vec<String> {
    attempt("links", Vec::new(), read_links(post)).await
}

/// Reaction counter; `0` when the post shows none. Fallback: `0`.
pub async fn reactions<E: PostElement>(post: &E) -> u64 {
    attempt("reactions", 0, read_reactions(post)).await
}

/// Comment counter; `0` when the post shows none. Fallback: `0`.
pub async fn comments<E: PostElement>(post: &E) -> u64 {
    attempt("comments", 0, read_comments(post)).await
}

async fn read_author<E: PostElement>(post: &E) -> Result<String, DriverError> {
    let link = child(post, selectors::AUTHOR_LINK).await?;
    link.attribute("href")
        .await?
        .ok_or_else(|| DriverError::MissingAttribute {
            selector: selectors::AUTHOR_LINK.to_owned(),
            attribute: "href".to_owned(),
        })
}

async fn read_time<E: PostElement>(post: &E) -> Result<String, DriverError> {
    let span = child(post, selectors::POST_TIME).await?;
    Ok(span.text_content().await?.trim().to_owned())
}

async fn read_text<E: PostElement>(post: &E) -> Result<String, DriverError> {
    let body = child(post, selectors::POST_BODY).await?;
    Ok(normalize_post_text(&body.text_content().await?))
}

async fn read_tags<E: PostElement>(post: &E) -> Result<Vec<String>, DriverError> {
    Ok(find_hashtags(&post.inner_text().await?))
}

async fn read_links<E: PostElement>(post: &E) -> Result<Vec<String>, DriverError> {
    Ok(find_links(&post.inner_text().await?))
}

async fn read_reactions<E: PostElement>(post: &E) -> Result<u64, DriverError> {
    match post.query_selector(selectors::REACTIONS_COUNT).await? {
        Some(counter) => Ok(parse_reaction_count(&counter.text_content().await?)),
        None => Ok(0),
    }
}

async fn read_comments<E: PostElement>(post: &E) -> Result<u64, DriverError> {
    match post.query_selector(selectors::COMMENTS_COUNT).await? {
        Some(counter) => Ok(parse_comment_count(&counter.text_content().await?)),
        None => Ok(0),
    }
}

async fn child<E: PostElement>(post: &E, selector: &str) -> Result<E, DriverError> {
    post.query_selector(selector)
        .await?
        .ok_or_else(|| DriverError::NotFound {
            selector: selector.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attempt_returns_value_on_success() {
        let value = attempt("n", 0u64, async { Ok::<_, DriverError>(7) }).await;
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn attempt_returns_fallback_on_error() {
        let value = attempt("time", TIME_FALLBACK.to_owned(), async {
            Err::<String, _>(DriverError::NotFound {
                selector: "span".to_owned(),
            })
        })
        .await;
        assert_eq!(value, "undefined");
    }
}
