use form_gallery::GalleryApplication;
use form_gallery::routes::IndexPage;
use gpui::{AppContext, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("form_gallery=info")),
        )
        .init();

    GalleryApplication::new().run(|cx| {
        let bounds = Bounds::centered(None, size(px(900.0), px(900.0)), cx);
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            ..Default::default()
        };
        if let Err(error) = cx.open_window(options, |_window, cx| cx.new(IndexPage::new)) {
            tracing::error!(%error, "failed to open the gallery window");
            return;
        }
        cx.activate(true);
    });
}
