use crate::{
    define_index_newtype,
    problem::{
        kilograms::Kilograms, location::Location, priority::Priority, time_window::TimeWindow,
    },
};

define_index_newtype!(NodeIdx, Order);

pub const DEPOT_ID: &str = "depot";
pub const DEPOT_LAT: f64 = 46.0506713158607;
pub const DEPOT_LON: f64 = 14.459560361232214;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: String,
    weight: Kilograms,
    priority: Priority,
    window: TimeWindow,
    location: Location,
}

impl Order {
    pub fn new(id: impl Into<String>, weight: Kilograms, location: Location) -> Self {
        Order {
            id: id.into(),
            weight,
            priority: Priority::default(),
            window: TimeWindow::NONE,
            location,
        }
    }

    /// The synthetic depot at the reference coordinate.
    pub fn depot() -> Self {
        Order::new(
            DEPOT_ID,
            Kilograms::ZERO,
            Location::from_lat_lon(DEPOT_LAT, DEPOT_LON),
        )
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Strips demand and window so the order can serve as the depot node.
    pub fn into_depot(self) -> Self {
        Order {
            weight: Kilograms::ZERO,
            window: TimeWindow::NONE,
            ..self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weight(&self) -> Kilograms {
        self.weight
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_depot(&self) -> bool {
        self.id == DEPOT_ID
    }

    /// Demand must be a finite non-negative weight at a finite coordinate.
    pub fn validate(&self) -> Result<(), String> {
        let weight = self.weight.value();
        if !weight.is_finite() || weight < 0.0 {
            return Err(format!("invalid weight {weight}"));
        }
        if !self.location.is_finite() {
            return Err("non finite coordinate".to_owned());
        }

        Ok(())
    }
}
