//! Scene host: result fetch, navigation and lifecycle forwarding

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::results::{
    Destinations, NavigationReporter, Navigator, ResultSource, SharedDestinations,
};
use crate::settings::Settings;
use crate::sim::{AccelSample, Scene};

/// Owns the scene and the fetched destinations
pub struct GameHost<S> {
    scene: Scene,
    source: S,
    destinations: SharedDestinations,
    requested: bool,
}

impl<S: ResultSource> GameHost<S> {
    pub fn new<N: Navigator + 'static>(settings: Settings, source: S, navigator: N) -> Self {
        let destinations: SharedDestinations = Rc::new(RefCell::new(None));
        let reporter = NavigationReporter::new(Rc::clone(&destinations), navigator);
        Self {
            scene: Scene::new(settings, Box::new(reporter)),
            source,
            destinations,
            requested: false,
        }
    }

    /// Kick off the result fetch; later calls do nothing
    pub fn load(&mut self) {
        if self.requested {
            return;
        }
        self.requested = true;
        let endpoint = self.scene.settings().result_endpoint.clone();
        log::info!("Fetching results from {}", endpoint);
        self.source.request(&endpoint);
    }

    pub fn appear(&mut self) {
        self.scene.present();
    }

    pub fn disappear(&mut self) {
        self.scene.dismiss();
    }

    /// Poll the fetch, then advance the scene
    pub fn update(&mut self, dt: f32) {
        if let Some(result) = self.source.poll() {
            match result {
                Ok(destinations) => {
                    log::info!("Results fetched");
                    *self.destinations.borrow_mut() = Some(destinations);
                }
                Err(e) => log::warn!("{}", e),
            }
        }
        self.scene.update(dt);
    }

    pub fn touch_down(&mut self, point: Vec2) {
        self.scene.touch_down(point);
    }

    pub fn touch_up(&mut self, point: Vec2) {
        self.scene.touch_up(point);
    }

    pub fn on_accelerometer(&mut self, sample: AccelSample) {
        self.scene.on_accelerometer(sample);
    }

    pub fn destinations(&self) -> Option<Destinations> {
        self.destinations.borrow().clone()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}
