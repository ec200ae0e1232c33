#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod case_tests;

#[cfg(test)]
mod dispute_tests;

#[cfg(test)]
mod document_tests;

#[cfg(test)]
mod reminder_tests;

#[cfg(test)]
mod report_tests;
