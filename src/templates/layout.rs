use maud::{html, Markup, DOCTYPE};

pub fn base_layout(title: &str, logged_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class="h-full" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Tunescore" }

                // Compiled TailwindCSS
                link rel="stylesheet" href="/static/css/output.css";

                // HTMX for interactivity
                script src="https://unpkg.com/htmx.org@1.9.10" {}

                style {
                    r#"
                    .artist-card:hover, .album-card:hover {
                        transform: translateY(-4px);
                        box-shadow: 0 10px 20px rgba(0,0,0,0.1);
                    }
                    "#
                }
            }
            body class="h-full bg-gray-50" {
                div class="min-h-full" {
                    (nav_bar(logged_in))

                    main class="container mx-auto px-4 py-8" {
                        (content)
                    }

                    (footer())
                }
            }
        }
    }
}

fn nav_bar(logged_in: bool) -> Markup {
    html! {
        nav class="bg-white shadow-sm" {
            div class="container mx-auto px-4" {
                div class="flex justify-between items-center h-16" {
                    a href="/" class="flex items-center space-x-3" {
                        span class="text-2xl" { "🎵" }
                        span class="text-xl font-bold text-gray-900" { "Tunescore" }
                    }

                    div class="flex space-x-4 items-center" {
                        a href="/" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                            "Home"
                        }
                        a href="/artists" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                            "Artists"
                        }
                        @if logged_in {
                            button
                                class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium"
                                hx-post="/logout" {
                                "Log out"
                            }
                        } @else {
                            a href="/login" class="text-gray-700 hover:text-primary px-3 py-2 rounded-md text-sm font-medium" {
                                "Log in"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="bg-white border-t border-gray-200 mt-12" {
            div class="container mx-auto px-4 py-6" {
                div class="text-center text-gray-600 text-sm" {
                    "Tunescore - Rate and review your music"
                }
            }
        }
    }
}
