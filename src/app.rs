/// Root of the testimonials site.
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use crate::components::testimonials::Testimonials;
use crate::config::{ApiBase, API_BASE_META};

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Server: from the request context. Browser: read back from the meta tag.
    let api_base = ApiBase::current();
    let meta_content = api_base.as_str().to_string();
    provide_context(api_base);

    view! {
        <Title text="Testimonials" />
        <Meta name=API_BASE_META content=meta_content />
        <Router>
            <main>
                <Routes>
                    <Route path="" view=Testimonials />
                </Routes>
            </main>
        </Router>
    }
}
