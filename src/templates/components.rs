use maud::{html, Markup};

use crate::db::enums::ContentRef;
use crate::services::RatingSummary;

pub struct ArtistCardData {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
}

pub struct AlbumCardData {
    pub id: i32,
    pub title: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub cover_art_url: Option<String>,
    pub release_date: Option<String>,
}

pub struct SongRowData {
    pub id: i32,
    pub title: String,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i32>,
}

pub struct ReviewItemData {
    pub content: String,
    pub verified: bool,
    pub author: Option<String>,
    pub created_at: String,
}

pub struct CommentItemData {
    pub content: String,
    pub author: Option<String>,
    pub created_at: String,
}

pub fn artist_card(artist: &ArtistCardData) -> Markup {
    let image_url = artist
        .image_url
        .as_deref()
        .unwrap_or("https://via.placeholder.com/300x300/1a1a1a/ffffff?text=No+Image");

    html! {
        a
            href={(format!("/artists/{}", artist.id))}
            class="artist-card bg-white rounded-lg shadow-md overflow-hidden cursor-pointer block" {

            div class="relative aspect-square" {
                img
                    src=(image_url)
                    alt=(artist.name)
                    class="w-full h-full object-cover"
                    loading="lazy";
            }

            div class="p-4" {
                h3 class="font-semibold text-gray-900 truncate" title=(artist.name) {
                    (artist.name)
                }
            }
        }
    }
}

pub fn album_card(album: &AlbumCardData) -> Markup {
    let cover_url = album
        .cover_art_url
        .as_deref()
        .unwrap_or("https://via.placeholder.com/300x300/1a1a1a/ffffff?text=No+Cover");

    html! {
        a
            href={(format!("/albums/{}", album.id))}
            class="album-card bg-white rounded-lg shadow-md overflow-hidden cursor-pointer block" {

            div class="relative aspect-square" {
                img
                    src=(cover_url)
                    alt={(format!("{} by {}", album.title, album.artist_name))}
                    class="w-full h-full object-cover"
                    loading="lazy";
            }

            div class="p-4" {
                h3 class="font-semibold text-gray-900 truncate" title=(album.title) {
                    (album.title)
                }
                p class="text-sm text-gray-600 truncate" title=(album.artist_name) {
                    (album.artist_name)
                }

                @if let Some(date) = &album.release_date {
                    p class="text-xs text-gray-500 mt-1" {
                        (date)
                    }
                }
            }
        }
    }
}

fn score_badge(average: Option<f64>) -> Markup {
    match average {
        Some(avg) => {
            let color = if avg >= 8.0 {
                "bg-green-500"
            } else if avg >= 5.0 {
                "bg-yellow-500"
            } else {
                "bg-red-500"
            };
            html! {
                span class={(format!("px-3 py-1 text-lg font-bold text-white rounded-full {}", color))} {
                    (format!("{:.1}", avg))
                }
            }
        }
        None => html! {
            span class="px-3 py-1 text-lg font-bold text-white bg-gray-400 rounded-full" {
                "–"
            }
        },
    }
}

pub fn rating_summary_panel(target: &ContentRef, summary: &RatingSummary) -> Markup {
    html! {
        div id={(format!("rating-summary-{}-{}", target.kind.as_str(), target.id))}
             class="bg-white rounded-lg shadow-sm p-4" {
            div class="flex items-center space-x-6" {
                div class="flex items-center space-x-2" {
                    (score_badge(summary.verified_average))
                    div {
                        p class="text-sm font-medium text-gray-700" { "Verified" }
                        p class="text-xs text-gray-500" {
                            (summary.verified_count) " rating" @if summary.verified_count != 1 { "s" }
                        }
                    }
                }
                div class="flex items-center space-x-2" {
                    (score_badge(summary.unverified_average))
                    div {
                        p class="text-sm font-medium text-gray-700" { "Anonymous" }
                        p class="text-xs text-gray-500" {
                            (summary.unverified_count) " rating" @if summary.unverified_count != 1 { "s" }
                        }
                    }
                }
            }
        }
    }
}

pub fn rating_form(target: &ContentRef) -> Markup {
    let summary_sel = format!("#rating-summary-{}-{}", target.kind.as_str(), target.id);

    html! {
        form
            class="flex items-center space-x-2 mt-4"
            hx-post="/ratings"
            hx-target=(summary_sel)
            hx-swap="outerHTML" {

            input type="hidden" name="kind" value=(target.kind.as_str());
            input type="hidden" name="id" value=(target.id);

            label class="text-sm font-medium text-gray-700" { "Your rating" }
            select
                name="value"
                class="px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary" {
                @for v in 1..=10 {
                    option value=(v) { (v) }
                }
            }
            button
                type="submit"
                class="bg-primary hover:bg-green-600 text-white font-semibold py-2 px-4 rounded-md transition" {
                "Rate"
            }
        }
    }
}

pub fn review_list(target: &ContentRef, reviews: &[ReviewItemData]) -> Markup {
    html! {
        div id={(format!("review-list-{}-{}", target.kind.as_str(), target.id))}
             class="space-y-4" {
            @if reviews.is_empty() {
                p class="text-gray-500 text-sm" { "No reviews yet. Be the first!" }
            }
            @for review in reviews {
                div class="bg-white rounded-lg shadow-sm p-4" {
                    div class="flex items-center space-x-2 mb-2" {
                        span class="font-semibold text-gray-900" {
                            (review.author.as_deref().unwrap_or("Anonymous"))
                        }
                        @if review.verified {
                            span class="px-2 py-0.5 text-xs font-semibold text-white bg-green-500 rounded-full" {
                                "Verified"
                            }
                        }
                        span class="text-xs text-gray-500" { (review.created_at) }
                    }
                    p class="text-gray-700 whitespace-pre-line" { (review.content) }
                }
            }
        }
    }
}

pub fn review_form(target: &ContentRef) -> Markup {
    let list_sel = format!("#review-list-{}-{}", target.kind.as_str(), target.id);

    html! {
        form
            class="mt-4 space-y-2"
            hx-post="/reviews"
            hx-target=(list_sel)
            hx-swap="outerHTML" {

            input type="hidden" name="kind" value=(target.kind.as_str());
            input type="hidden" name="id" value=(target.id);

            textarea
                name="content"
                rows="3"
                placeholder="Write a review..."
                class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary" {}
            button
                type="submit"
                class="bg-primary hover:bg-green-600 text-white font-semibold py-2 px-4 rounded-md transition" {
                "Post Review"
            }
        }
    }
}

pub fn comment_list(target: &ContentRef, comments: &[CommentItemData]) -> Markup {
    html! {
        div id={(format!("comment-list-{}-{}", target.kind.as_str(), target.id))}
             class="space-y-2" {
            @if comments.is_empty() {
                p class="text-gray-500 text-sm" { "No comments yet." }
            }
            @for comment in comments {
                div class="bg-gray-50 rounded-md p-3" {
                    div class="flex items-center space-x-2 mb-1" {
                        span class="text-sm font-semibold text-gray-900" {
                            (comment.author.as_deref().unwrap_or("Anonymous"))
                        }
                        span class="text-xs text-gray-500" { (comment.created_at) }
                    }
                    p class="text-sm text-gray-700" { (comment.content) }
                }
            }
        }
    }
}

pub fn comment_form(target: &ContentRef) -> Markup {
    let list_sel = format!("#comment-list-{}-{}", target.kind.as_str(), target.id);

    html! {
        form
            class="mt-2 flex space-x-2"
            hx-post="/comments"
            hx-target=(list_sel)
            hx-swap="outerHTML" {

            input type="hidden" name="kind" value=(target.kind.as_str());
            input type="hidden" name="id" value=(target.id);

            input
                type="text"
                name="content"
                placeholder="Add a comment..."
                class="flex-grow px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
            button
                type="submit"
                class="bg-gray-700 hover:bg-gray-800 text-white font-semibold py-2 px-4 rounded-md transition" {
                "Comment"
            }
        }
    }
}

pub fn favorite_button(target: &ContentRef, favorited: bool, logged_in: bool) -> Markup {
    let button_id = format!("favorite-{}-{}", target.kind.as_str(), target.id);

    if !logged_in {
        return html! {
            a id=(button_id) href="/login" class="text-sm text-gray-500 hover:text-primary" {
                "♡ Log in to favorite"
            }
        };
    }

    html! {
        form
            id=(button_id)
            hx-post="/favorites/toggle"
            hx-target={(format!("#{}", button_id))}
            hx-swap="outerHTML" {

            input type="hidden" name="kind" value=(target.kind.as_str());
            input type="hidden" name="id" value=(target.id);

            button
                type="submit"
                class=(if favorited {
                    "px-4 py-2 bg-red-500 hover:bg-red-600 text-white font-semibold rounded-md"
                } else {
                    "px-4 py-2 bg-white border border-gray-300 hover:bg-gray-50 text-gray-700 font-semibold rounded-md"
                }) {
                @if favorited { "♥ Favorited" } @else { "♡ Favorite" }
            }
        }
    }
}

pub fn song_table(songs: &[SongRowData]) -> Markup {
    html! {
        table class="min-w-full bg-white rounded-lg shadow-sm overflow-hidden" {
            thead class="bg-gray-50" {
                tr {
                    th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase w-12" { "#" }
                    th class="px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase" { "Title" }
                    th class="px-4 py-3 text-right text-xs font-medium text-gray-500 uppercase" { "Length" }
                }
            }
            tbody class="divide-y divide-gray-200" {
                @for song in songs {
                    tr class="hover:bg-gray-50" {
                        td class="px-4 py-3 text-sm text-gray-500" {
                            @if let Some(n) = song.track_number { (n) }
                        }
                        td class="px-4 py-3" {
                            a href={(format!("/songs/{}", song.id))}
                              class="text-sm font-medium text-gray-900 hover:text-primary hover:underline" {
                                (song.title)
                            }
                        }
                        td class="px-4 py-3 text-sm text-gray-500 text-right" {
                            (song.duration_ms.map(format_duration).unwrap_or_default())
                        }
                    }
                }
            }
        }
    }
}

/// Append a `page` parameter, joining with `&` when the base URL
/// already carries a query string.
fn page_url(base_url: &str, page: u64) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base_url, separator, page)
}

pub fn pagination(page: u64, total_pages: u64, base_url: &str, target: &str) -> Markup {
    html! {
        div class="flex justify-center items-center space-x-2 mt-8" {
            @if page > 1 {
                button
                    class="px-4 py-2 bg-white border border-gray-300 rounded-md hover:bg-gray-50"
                    hx-get=(page_url(base_url, page - 1))
                    hx-target=(target)
                    hx-swap="innerHTML" {
                    "Previous"
                }
            } @else {
                button class="px-4 py-2 bg-gray-100 border border-gray-300 rounded-md text-gray-400 cursor-not-allowed" disabled {
                    "Previous"
                }
            }

            @for p in page_range(page, total_pages) {
                @if p == page {
                    span class="px-4 py-2 bg-primary text-white rounded-md font-semibold" {
                        (p)
                    }
                } @else {
                    button
                        class="px-4 py-2 bg-white border border-gray-300 rounded-md hover:bg-gray-50"
                        hx-get=(page_url(base_url, p))
                        hx-target=(target)
                        hx-swap="innerHTML" {
                        (p)
                    }
                }
            }

            @if page < total_pages {
                button
                    class="px-4 py-2 bg-white border border-gray-300 rounded-md hover:bg-gray-50"
                    hx-get=(page_url(base_url, page + 1))
                    hx-target=(target)
                    hx-swap="innerHTML" {
                    "Next"
                }
            } @else {
                button class="px-4 py-2 bg-gray-100 border border-gray-300 rounded-md text-gray-400 cursor-not-allowed" disabled {
                    "Next"
                }
            }
        }
    }
}

fn page_range(current: u64, total: u64) -> Vec<u64> {
    let range = 2; // pages shown either side of current
    let start = current.saturating_sub(range).max(1);
    let end = (current + range).min(total);
    (start..=end).collect()
}

fn format_duration(ms: i32) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}
