use maud::{html, Markup};

use crate::db::enums::ContentRef;
use crate::services::RatingSummary;

use super::components::*;
use super::layout::base_layout;

pub fn home_page(
    logged_in: bool,
    recent_albums: &[AlbumCardData],
    recent_reviews: &[ReviewItemData],
) -> Markup {
    let content = html! {
        div class="text-center py-12 mb-8 bg-gradient-to-r from-green-50 to-gray-50 rounded-lg" {
            h1 class="text-4xl font-bold text-gray-900 mb-3" { "Rate the music you love" }
            p class="text-lg text-gray-600" {
                "Browse artists and albums, leave ratings and reviews, and keep track of your favorites."
            }
        }

        section class="mb-12" {
            h2 class="text-2xl font-semibold text-gray-900 mb-4" { "Recently added albums" }
            @if recent_albums.is_empty() {
                p class="text-gray-500" { "Nothing here yet." }
            } @else {
                div class="grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 gap-6" {
                    @for album in recent_albums {
                        (album_card(album))
                    }
                }
            }
        }

        section {
            h2 class="text-2xl font-semibold text-gray-900 mb-4" { "Latest reviews" }
            @if recent_reviews.is_empty() {
                p class="text-gray-500" { "No reviews yet." }
            } @else {
                div class="space-y-4" {
                    @for review in recent_reviews {
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
                            p class="text-gray-700" { (review.content) }
                        }
                    }
                }
            }
        }
    };

    base_layout("Home", logged_in, content)
}

pub fn artists_page(logged_in: bool) -> Markup {
    let content = html! {
        div class="mb-8" {
            h1 class="text-3xl font-bold text-gray-900 mb-6" { "Artists" }

            div class="bg-white rounded-lg shadow-sm p-4" {
                input
                    type="search"
                    name="search"
                    placeholder="Search artists..."
                    class="w-full px-4 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary"
                    hx-get="/artists/grid"
                    hx-trigger="input changed delay:300ms, search"
                    hx-target="#artist-grid"
                    hx-swap="innerHTML"
                    hx-include="this";
            }
        }

        div
            id="artist-grid"
            hx-get="/artists/grid"
            hx-trigger="load"
            hx-swap="innerHTML" {
            div class="text-center py-12 text-gray-500" { "Loading artists..." }
        }
    };

    base_layout("Artists", logged_in, content)
}

pub fn artist_grid_partial(
    artists: &[ArtistCardData],
    page: u64,
    total_pages: u64,
    search: Option<&str>,
) -> Markup {
    html! {
        @if artists.is_empty() {
            div class="text-center py-12" {
                p class="text-gray-500 text-lg" { "No artists found." }
            }
        } @else {
            div class="grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 gap-6" {
                @for artist in artists {
                    (artist_card(artist))
                }
            }

            @if total_pages > 1 {
                @let base_url = match search {
                    Some(s) if !s.is_empty() => {
                        format!("/artists/grid?search={}", urlencoding::encode(s))
                    }
                    _ => "/artists/grid".to_string(),
                };
                (pagination(page, total_pages, &base_url, "#artist-grid"))
            }
        }
    }
}

pub struct DetailContext<'a> {
    pub logged_in: bool,
    pub target: ContentRef,
    pub summary: &'a RatingSummary,
    pub favorited: bool,
    pub reviews: &'a [ReviewItemData],
    pub comments: &'a [CommentItemData],
}

fn engagement_section(ctx: &DetailContext<'_>) -> Markup {
    html! {
        section class="mb-8" {
            h2 class="text-xl font-semibold text-gray-900 mb-3" { "Ratings" }
            (rating_summary_panel(&ctx.target, ctx.summary))
            (rating_form(&ctx.target))
        }

        section class="mb-8" {
            h2 class="text-xl font-semibold text-gray-900 mb-3" { "Reviews" }
            (review_list(&ctx.target, ctx.reviews))
            (review_form(&ctx.target))
        }

        section {
            h2 class="text-xl font-semibold text-gray-900 mb-3" { "Comments" }
            (comment_list(&ctx.target, ctx.comments))
            (comment_form(&ctx.target))
        }
    }
}

pub struct ArtistDetailData<'a> {
    pub name: &'a str,
    pub bio: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub albums: &'a [AlbumCardData],
}

pub fn artist_detail_page(artist: &ArtistDetailData<'_>, ctx: &DetailContext<'_>) -> Markup {
    let image_url = artist
        .image_url
        .unwrap_or("https://via.placeholder.com/300x300/1a1a1a/ffffff?text=No+Image");

    let content = html! {
        div class="flex flex-col md:flex-row gap-8 mb-8" {
            img
                src=(image_url)
                alt=(artist.name)
                class="w-48 h-48 rounded-lg object-cover shadow-md";

            div class="flex-grow" {
                div class="flex items-center justify-between" {
                    h1 class="text-3xl font-bold text-gray-900" { (artist.name) }
                    (favorite_button(&ctx.target, ctx.favorited, ctx.logged_in))
                }
                @if let Some(bio) = artist.bio {
                    p class="text-gray-600 mt-3 whitespace-pre-line" { (bio) }
                }
            }
        }

        @if !artist.albums.is_empty() {
            section class="mb-8" {
                h2 class="text-xl font-semibold text-gray-900 mb-3" { "Albums" }
                div class="grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 lg:grid-cols-5 gap-6" {
                    @for album in artist.albums {
                        (album_card(album))
                    }
                }
            }
        }

        (engagement_section(ctx))
    };

    base_layout(artist.name, ctx.logged_in, content)
}

pub struct AlbumDetailData<'a> {
    pub title: &'a str,
    pub artist_id: i32,
    pub artist_name: &'a str,
    pub cover_art_url: Option<&'a str>,
    pub release_date: Option<&'a str>,
    pub songs: &'a [SongRowData],
}

pub fn album_detail_page(album: &AlbumDetailData<'_>, ctx: &DetailContext<'_>) -> Markup {
    let cover_url = album
        .cover_art_url
        .unwrap_or("https://via.placeholder.com/300x300/1a1a1a/ffffff?text=No+Cover");

    let content = html! {
        div class="flex flex-col md:flex-row gap-8 mb-8" {
            img
                src=(cover_url)
                alt=(album.title)
                class="w-48 h-48 rounded-lg object-cover shadow-md";

            div class="flex-grow" {
                div class="flex items-center justify-between" {
                    h1 class="text-3xl font-bold text-gray-900" { (album.title) }
                    (favorite_button(&ctx.target, ctx.favorited, ctx.logged_in))
                }
                p class="text-lg text-gray-600 mt-1" {
                    "by "
                    a href={(format!("/artists/{}", album.artist_id))}
                      class="text-primary hover:underline" {
                        (album.artist_name)
                    }
                }
                @if let Some(date) = album.release_date {
                    p class="text-sm text-gray-500 mt-1" { "Released " (date) }
                }
            }
        }

        @if !album.songs.is_empty() {
            section class="mb-8" {
                h2 class="text-xl font-semibold text-gray-900 mb-3" { "Tracklist" }
                (song_table(album.songs))
            }
        }

        (engagement_section(ctx))
    };

    base_layout(album.title, ctx.logged_in, content)
}

pub struct SongDetailData<'a> {
    pub title: &'a str,
    pub album_id: i32,
    pub album_title: &'a str,
    pub artist_id: i32,
    pub artist_name: &'a str,
    pub track_number: Option<i32>,
    pub duration_ms: Option<i32>,
}

pub fn song_detail_page(song: &SongDetailData<'_>, ctx: &DetailContext<'_>) -> Markup {
    let content = html! {
        div class="mb-8" {
            div class="flex items-center justify-between" {
                h1 class="text-3xl font-bold text-gray-900" { (song.title) }
                (favorite_button(&ctx.target, ctx.favorited, ctx.logged_in))
            }
            p class="text-lg text-gray-600 mt-1" {
                "from "
                a href={(format!("/albums/{}", song.album_id))}
                  class="text-primary hover:underline" {
                    (song.album_title)
                }
                " by "
                a href={(format!("/artists/{}", song.artist_id))}
                  class="text-primary hover:underline" {
                    (song.artist_name)
                }
            }
            div class="flex space-x-4 text-sm text-gray-500 mt-2" {
                @if let Some(n) = song.track_number {
                    span { "Track " (n) }
                }
                @if let Some(ms) = song.duration_ms {
                    @let total = ms / 1000;
                    span { (format!("{}:{:02}", total / 60, total % 60)) }
                }
            }
        }

        (engagement_section(ctx))
    };

    base_layout(song.title, ctx.logged_in, content)
}

pub struct ProfileData<'a> {
    pub username: &'a str,
    pub display_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub rating_count: u64,
    pub review_count: u64,
    pub favorites: &'a [(String, String)], // (label, href)
    pub reviews: &'a [ReviewItemData],
}

pub fn profile_page(logged_in: bool, profile: &ProfileData<'_>) -> Markup {
    let shown_name = profile.display_name.unwrap_or(profile.username);

    let content = html! {
        div class="mb-8" {
            h1 class="text-3xl font-bold text-gray-900" { (shown_name) }
            p class="text-gray-500" { "@" (profile.username) }
            @if let Some(bio) = profile.bio {
                p class="text-gray-600 mt-3 whitespace-pre-line" { (bio) }
            }
            div class="flex space-x-6 mt-4 text-sm text-gray-600" {
                span { strong { (profile.rating_count) } " ratings" }
                span { strong { (profile.review_count) } " reviews" }
                span { strong { (profile.favorites.len()) } " favorites" }
            }
        }

        section class="mb-8" {
            h2 class="text-xl font-semibold text-gray-900 mb-3" { "Favorites" }
            @if profile.favorites.is_empty() {
                p class="text-gray-500 text-sm" { "No favorites yet." }
            } @else {
                ul class="space-y-1" {
                    @for (label, href) in profile.favorites {
                        li {
                            a href=(href) class="text-primary hover:underline" { (label) }
                        }
                    }
                }
            }
        }

        section {
            h2 class="text-xl font-semibold text-gray-900 mb-3" { "Reviews" }
            @if profile.reviews.is_empty() {
                p class="text-gray-500 text-sm" { "No reviews yet." }
            } @else {
                div class="space-y-4" {
                    @for review in profile.reviews {
                        div class="bg-white rounded-lg shadow-sm p-4" {
                            div class="flex items-center space-x-2 mb-2" {
                                span class="text-xs text-gray-500" { (review.created_at) }
                            }
                            p class="text-gray-700" { (review.content) }
                        }
                    }
                }
            }
        }
    };

    base_layout(shown_name, logged_in, content)
}

pub fn login_page(error: Option<&str>) -> Markup {
    let content = html! {
        div class="max-w-md mx-auto mt-12" {
            @if let Some(message) = error {
                div class="bg-red-50 border border-red-300 text-red-700 px-4 py-3 rounded-md mb-6" {
                    (message)
                }
            }

            div class="bg-white rounded-lg shadow-md p-6 mb-8" {
                h1 class="text-2xl font-bold text-gray-900 mb-4" { "Log in" }
                form method="post" action="/login" class="space-y-4" {
                    div {
                        label class="block text-sm font-medium text-gray-700 mb-1" { "Username" }
                        input
                            type="text"
                            name="username"
                            required
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700 mb-1" { "Password" }
                        input
                            type="password"
                            name="password"
                            required
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
                    }
                    button
                        type="submit"
                        class="w-full bg-primary hover:bg-green-600 text-white font-semibold py-2 px-4 rounded-md transition" {
                        "Log in"
                    }
                }
            }

            div class="bg-white rounded-lg shadow-md p-6" {
                h2 class="text-2xl font-bold text-gray-900 mb-4" { "Create an account" }
                form method="post" action="/register" class="space-y-4" {
                    div {
                        label class="block text-sm font-medium text-gray-700 mb-1" { "Username" }
                        input
                            type="text"
                            name="username"
                            required
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
                    }
                    div {
                        label class="block text-sm font-medium text-gray-700 mb-1" { "Password" }
                        input
                            type="password"
                            name="password"
                            required
                            minlength="8"
                            class="w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-primary";
                    }
                    button
                        type="submit"
                        class="w-full bg-gray-700 hover:bg-gray-800 text-white font-semibold py-2 px-4 rounded-md transition" {
                        "Register"
                    }
                }
            }
        }
    };

    base_layout("Log in", false, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_artists() -> Vec<ArtistCardData> {
        vec![ArtistCardData {
            id: 1,
            name: "Queen".to_string(),
            image_url: None,
        }]
    }

    #[test]
    fn test_searched_grid_pagination_joins_with_ampersand() {
        let html = artist_grid_partial(&sample_artists(), 2, 3, Some("queen")).into_string();

        assert!(html.contains("search=queen&amp;page=1"));
        assert!(html.contains("search=queen&amp;page=3"));
        assert!(!html.contains("queen?page="));
    }

    #[test]
    fn test_unfiltered_grid_pagination_starts_query_string() {
        let html = artist_grid_partial(&sample_artists(), 1, 2, None).into_string();

        assert!(html.contains("/artists/grid?page=2"));
    }

    #[test]
    fn test_search_term_is_url_encoded() {
        let html =
            artist_grid_partial(&sample_artists(), 1, 2, Some("rock & roll")).into_string();

        assert!(html.contains("search=rock%20%26%20roll&amp;page=2"));
        assert!(!html.contains("search=rock & roll"));
    }
}
