use super::{Element, Node, el, relative_time};
use crate::models::Post;

const NAV_LINK: &str = "text-2xl no-underline hover:text-indigo-800";
const FIELD: &str = "w-full block bg-indigo-100 rounded p-0.5";
const SUBMIT: &str = "bg-indigo-100 block my-2 !px-2 rounded p-0.5 hover:bg-indigo-200";

pub(super) fn shell(content: Node, signed_in: bool) -> Node {
    el("html")
        .child(
            el("head")
                .child(el("meta").attr("charset", "utf-8"))
                .child(
                    el("meta")
                        .attr("name", "viewport")
                        .attr("content", "width=device-width, initial-scale=1"),
                )
                .child(el("title").text("Cheeper")),
        )
        .child(
            el("body").child(
                el("div")
                    .class("min-h-screen")
                    .child(nav_bar(signed_in))
                    .child(content),
            ),
        )
        .into()
}

fn nav_item(href: &str, label: &str) -> Element {
    el("div")
        .class("mb-0")
        .child(el("a").attr("href", href).class(NAV_LINK).text(label))
}

fn nav_bar(signed_in: bool) -> Element {
    let nav = el("nav")
        .class("font-sans flex text-center flex-row text-left justify-between py-4 px-6 bg-white shadow items-baseline w-full")
        .child(nav_item("/", "Home"));

    if signed_in {
        nav.child(nav_item("/new", "Cheep"))
            .child(nav_item("/logout", "Logout"))
    } else {
        nav.child(nav_item("/login", "Login"))
    }
}

/// The feed: one entry per post, in the order given.
pub fn feed(posts: &[Post], author: &str, now_ms: i64) -> Element {
    el("div").class("flex px-4 justify-center items-center").child(
        el("div").children(posts.iter().map(|post| cheep(post, author, now_ms))),
    )
}

fn cheep(post: &Post, author: &str, now_ms: i64) -> Element {
    let link = post.url.as_deref().map(|url| {
        el("a")
            .attr("href", url)
            .attr("rel", "noopener noreferrer")
            .class("text-indigo-600 break-all")
            .text(url)
    });
    let media = post.file.as_deref().map(|file| {
        el("img")
            .attr("src", file)
            .attr("alt", "")
            .class("max-w-full rounded")
    });

    el("div")
        .class("block my-10")
        .child(el("span").class("font-bold").text(author))
        .child(
            el("span")
                .class("text-gray-400 text-sm")
                .text(format!(" - {}", relative_time(post.time, now_ms))),
        )
        .child(el("p").text(post.text.as_str()))
        .child_opt(link)
        .child_opt(media)
        .child(
            el("div")
                .class("pt-1")
                .child(el("a").attr("href", "#").text("❤"))
                .child(
                    el("span")
                        .class("text-red-700")
                        .text(format!("×{}", post.like_count())),
                ),
        )
}

pub fn login(invalid: bool) -> Element {
    let form = el("form")
        .attr("action", "/login")
        .attr("method", "POST")
        .child(
            el("input")
                .attr("type", "email")
                .class(FIELD)
                .attr("name", "emailaddress")
                .attr("id", "emailaddress")
                .attr("autocomplete", "username")
                .attr("required", ""),
        )
        .child(
            el("input")
                .attr("type", "password")
                .class(format!("my-2 {FIELD}"))
                .attr("name", "password")
                .attr("id", "password")
                .attr("autocomplete", "current-password")
                .attr("required", ""),
        )
        .child(
            el("input")
                .class(SUBMIT)
                .attr("type", "submit")
                .attr("value", "Login"),
        );

    let error = invalid.then(|| el("div").class("text-red-500").text("bad login :("));

    el("div").class("flex justify-center items-center").child(
        el("div")
            .class("max-w-7xl py-12 px-4 sm:px-6 lg:py-24 lg:px-8")
            .child(form)
            .child_opt(error),
    )
}

pub fn compose() -> Element {
    let form = el("form")
        .attr("action", "/new")
        .attr("method", "POST")
        .child(
            el("textarea")
                .class("block h-24 w-full bg-indigo-100 rounded p-0.5")
                .attr("name", "text")
                .attr("id", "text")
                .attr("required", ""),
        )
        .child(
            el("input")
                .class(format!("my-2 {FIELD}"))
                .attr("type", "url")
                .attr("name", "url")
                .attr("id", "url")
                .attr("placeholder", "https://"),
        )
        .child(
            el("input")
                .class(format!("my-2 {FIELD}"))
                .attr("type", "text")
                .attr("name", "file")
                .attr("id", "file")
                .attr("placeholder", "image or video link"),
        )
        .child(
            el("input")
                .class(SUBMIT)
                .attr("type", "submit")
                .attr("value", "Cheep"),
        );

    el("div").class("flex justify-center items-center").child(
        el("div")
            .class("max-w-full py-12 px-4 sm:px-6 lg:py-24 lg:px-8 lg:flex lg:items-center lg:justify-between")
            .child(form),
    )
}

fn status_page(code: &str, title: &str, message: &str) -> Element {
    el("div")
        .class("min-h-full px-4 py-16 sm:px-6 sm:py-24 md:grid md:place-items-center lg:px-8")
        .child(
            el("div").class("max-w-max mx-auto").child(
                el("main")
                    .class("sm:flex")
                    .child(
                        el("p")
                            .class("text-4xl font-extrabold text-indigo-600 sm:text-5xl")
                            .text(code),
                    )
                    .child(
                        el("div").class("sm:ml-6").child(
                            el("div")
                                .class("sm:border-l sm:border-gray-200 sm:pl-6")
                                .child(
                                    el("h1")
                                        .class("text-4xl font-extrabold text-gray-900 tracking-tight sm:text-5xl")
                                        .text(title),
                                )
                                .child(el("p").class("mt-1 text-base text-gray-500").text(message)),
                        ),
                    ),
            ),
        )
}

pub fn not_found() -> Element {
    status_page(
        "404",
        "Page not found",
        "Please check the URL in the address bar and try again.",
    )
}

pub fn not_allowed() -> Element {
    status_page("401", "Unauthorised", "Please sign in and try again.")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn feed_keeps_post_order() {
        let posts = vec![Post::new("first".into(), NOW), Post::new("second".into(), NOW - 1)];
        let html = Node::from(feed(&posts, "TodePond", NOW)).to_html();

        let first = html.find("<p>first</p>").unwrap();
        let second = html.find("<p>second</p>").unwrap();
        assert!(first < second);
        assert_eq!(html.matches("TodePond").count(), 2);
    }

    #[test]
    fn cheep_shows_likes_link_and_media() {
        let post = Post {
            text: "look".into(),
            time: NOW,
            url: Some("https://example.com".into()),
            file: Some("https://cdn.example.com/cat.png".into()),
            likes: Some(4),
        };
        let html = Node::from(feed(&[post], "me", NOW)).to_html();

        assert!(html.contains("×4"));
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"<img src="https://cdn.example.com/cat.png""#));
        assert!(html.contains(" - now"));
    }

    #[test]
    fn cheep_without_likes_shows_zero() {
        let html = Node::from(feed(&[Post::new("x".into(), NOW)], "me", NOW)).to_html();
        assert!(html.contains("×0"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn login_error_only_when_invalid() {
        assert!(Node::from(login(true)).to_html().contains("bad login :("));
        assert!(!Node::from(login(false)).to_html().contains("bad login :("));
    }

    #[test]
    fn compose_posts_to_new() {
        let html = Node::from(compose()).to_html();
        assert!(html.contains(r#"<form action="/new" method="POST">"#));
        assert!(html.contains(r#"name="text""#));
    }

    #[test]
    fn status_pages() {
        assert!(Node::from(not_found()).to_html().contains("Page not found"));
        assert!(Node::from(not_allowed()).to_html().contains("Unauthorised"));
    }
}
