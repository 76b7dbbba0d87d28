pub mod fixtures;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod doctor_tests;
#[cfg(test)]
mod speech_tests;
#[cfg(test)]
mod translate_tests;
