pub mod city;
pub mod user_city;
