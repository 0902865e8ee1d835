use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::data::dataset::Dataset;

/// Categorical gender attribute, encoded numerically for clustering
/// (Male = 0, Female = 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn encode(&self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

impl FromStr for Gender {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {}.", s).into()),
        }
    }
}

/// A single customer record. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: u32,
    pub gender: Gender,
    pub age: f64,
    pub annual_income: f64,
    pub spending_score: f64,
}

impl Customer {
    pub fn new(id: u32, gender: Gender, age: f64, annual_income: f64, spending_score: f64) -> Self {
        Self {
            id,
            gender,
            age,
            annual_income,
            spending_score,
        }
    }
}

/// A numeric attribute selectable as a clustering dimension.
///
/// Feature access is by variant, not by string key; string names only exist
/// at the parse boundary, so an unknown name fails before any clustering
/// work begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Age,
    AnnualIncome,
    SpendingScore,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Age, Feature::AnnualIncome, Feature::SpendingScore];

    /// The column name used by the customer dataset.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Age => "Age",
            Feature::AnnualIncome => "Annual Income (k$)",
            Feature::SpendingScore => "Spending Score (1-100)",
        }
    }

    pub fn value_of(&self, customer: &Customer) -> f64 {
        match self {
            Feature::Age => customer.age,
            Feature::AnnualIncome => customer.annual_income,
            Feature::SpendingScore => customer.spending_score,
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Age" => Ok(Feature::Age),
            "Annual Income (k$)" | "Annual Income" => Ok(Feature::AnnualIncome),
            "Spending Score (1-100)" | "Spending Score" => Ok(Feature::SpendingScore),
            _ => Err(format!("Unknown feature: {}.", s).into()),
        }
    }
}

/// Parses an ordered list of feature names, preserving the given order.
pub fn parse_features(names: &[&str]) -> Result<Vec<Feature>, Box<dyn Error>> {
    names.iter().map(|name| name.parse::<Feature>()).collect()
}

/// Projects one customer onto the selected features, in selection order.
pub fn project(customer: &Customer, features: &[Feature]) -> DVector<f64> {
    DVector::from_iterator(
        features.len(),
        features.iter().map(|feature| feature.value_of(customer)),
    )
}

/// Projects every customer onto the selected features, producing the
/// row-per-record dataset the clustering core operates on.
pub fn project_all(customers: &[Customer], features: &[Feature]) -> Result<Dataset<f64>, Box<dyn Error>> {
    if features.is_empty() {
        return Err("The feature selection must not be empty.".into());
    }

    let mut values = Vec::with_capacity(customers.len() * features.len());
    for customer in customers {
        for feature in features {
            values.push(feature.value_of(customer));
        }
    }

    let x = DMatrix::from_row_slice(customers.len(), features.len(), &values);
    Ok(Dataset::new(x))
}

/// Loads customer records from a CSV file with the columns
/// `CustomerID,Gender,Age,Annual Income (k$),Spending Score (1-100)`.
pub fn load_customers(file_path: &str, header: bool) -> Result<Vec<Customer>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(header)
        .from_path(file_path)?;
    let mut customers = Vec::new();

    for result in reader.records() {
        let record = result?;

        let id = record.get(0).ok_or("Missing customer id")?.parse::<u32>()?;
        let gender = record.get(1).ok_or("Missing gender")?.parse::<Gender>()?;
        let age = record.get(2).ok_or("Missing age")?.parse::<f64>()?;
        let annual_income = record
            .get(3)
            .ok_or("Missing annual income")?
            .parse::<f64>()?;
        let spending_score = record
            .get(4)
            .ok_or("Missing spending score")?
            .parse::<f64>()?;

        customers.push(Customer::new(id, gender, age, annual_income, spending_score));
    }

    Ok(customers)
}
