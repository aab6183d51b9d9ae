use crate::assets::Assets;
use crate::motion::MotionConfig;
use crate::provider::GalleryProvider;
use crate::theme::Theme;

type LaunchHook = Box<dyn FnOnce(&mut gpui::App, &GalleryProvider) + 'static>;

/// Builder around `gpui::Application` that installs the provider and the embedded assets.
pub struct GalleryApplication {
    application: gpui::Application,
    provider: GalleryProvider,
    launch_hooks: Vec<LaunchHook>,
}

impl Default for GalleryApplication {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryApplication {
    pub fn new() -> Self {
        Self::from_application(gpui::Application::new())
    }

    pub fn headless() -> Self {
        Self::from_application(gpui::Application::headless())
    }

    pub fn from_application(application: gpui::Application) -> Self {
        Self {
            application: application.with_assets(Assets),
            provider: GalleryProvider::new(),
            launch_hooks: Vec::new(),
        }
    }

    pub fn with_assets(mut self, asset_source: impl gpui::AssetSource) -> Self {
        self.application = self.application.with_assets(asset_source);
        self
    }

    pub fn with_provider(mut self, provider: GalleryProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn set_theme(mut self, theme: Theme) -> Self {
        self.provider = self.provider.set_theme(|_| theme);
        self
    }

    pub fn with_motion(mut self, motion: MotionConfig) -> Self {
        self.provider = self.provider.with_motion(motion);
        self
    }

    pub fn before_launch(
        mut self,
        hook: impl FnOnce(&mut gpui::App, &GalleryProvider) + 'static,
    ) -> Self {
        self.launch_hooks.push(Box::new(hook));
        self
    }

    pub fn run<F>(self, on_finish_launching: F)
    where
        F: 'static + FnOnce(&mut gpui::App),
    {
        let provider = self.provider;
        let launch_hooks = self.launch_hooks;
        self.application.run(move |cx| {
            provider.clone().install(cx);
            crate::components::input_actions::ensure_text_keybindings(cx);

            for hook in launch_hooks {
                hook(cx, &provider);
            }

            on_finish_launching(cx);
        });
    }
}
