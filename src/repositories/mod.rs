pub(crate) mod admins;
pub(crate) mod classes;
pub(crate) mod images;
pub(crate) mod lessons;
pub(crate) mod questions;
pub(crate) mod units;
pub(crate) mod videos;
