pub mod config;
pub mod db;
pub mod error_convert;
pub mod health;
pub mod openapi;
pub mod telemetry;

pub mod auth;
pub mod repo;
pub mod rest;
pub mod storage;

// Workflow core
pub mod assignment;
pub mod identity;
pub mod ledger;
pub mod lifecycle;
pub mod policy;
