pub mod coordinator;
pub mod directions;
pub mod error;
pub mod explore;
pub mod geometry;
pub mod map_view;
pub mod routing;
pub mod waypoints;

#[cfg(test)]
pub(crate) mod test_utils;
