//! Alert messages shown to the user when a partial update fails.
//!
//! Alerts render as a replacement for the `#alert-container` element in the
//! page shell, so they can arrive either as an error response targeted with
//! `hx-target-error` or as an out-of-band extra in a normal swap.

use axum::response::Html;
use maud::html;

/// An alert message and its styling.
pub enum Alert {
    /// Something went wrong. `details` may be empty.
    Error { message: String, details: String },
}

impl Alert {
    /// Renders the alert as a replacement for the page's alert container.
    pub fn into_html(self) -> Html<String> {
        let Alert::Error { message, details } = self;

        let markup = html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class="flex items-start p-4 rounded shadow text-red-800 bg-red-50
                        dark:bg-gray-800 dark:text-red-400"
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty()
                        {
                            p class="text-sm mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Close"
                        class="ms-2 font-semibold cursor-pointer"
                        onclick="document.getElementById('alert-container').classList.add('hidden')"
                    {
                        "\u{00d7}"
                    }
                }
            }
        };

        Html(markup.into_string())
    }
}
