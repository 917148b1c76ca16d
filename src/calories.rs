//! Household energy needs: Mifflin–St Jeor BMR, activity-scaled TDEE, and how a
//! meal's calories divide between family members.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub name: String,
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

/// Basal metabolic rate in kcal/day.
pub fn bmr(m: &FamilyMember) -> f64 {
    let base = 10.0 * m.weight + 6.25 * m.height - 5.0 * f64::from(m.age);
    match m.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure in kcal/day.
pub fn tdee(m: &FamilyMember) -> f64 {
    bmr(m) * m.activity_level.multiplier()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealShare {
    pub name: String,
    pub calories: u32,
    pub percentage: u32,
}

/// Split `meal_calories` in proportion to each member's TDEE. Each member is
/// rounded on its own, so the shares need not add up exactly.
pub fn distribute_meal_calories(members: &[FamilyMember], meal_calories: f64) -> Vec<MealShare> {
    let needs: Vec<f64> = members.iter().map(tdee).collect();
    let total: f64 = needs.iter().sum();

    members
        .iter()
        .zip(needs)
        .map(|(m, need)| {
            let ratio = if total > 0.0 { need / total } else { 0.0 };
            MealShare {
                name: m.name.clone(),
                calories: (meal_calories * ratio).round().max(0.0) as u32,
                percentage: (ratio * 100.0).round().max(0.0) as u32,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySplit {
    pub breakfast: u32,
    pub lunch: u32,
    pub dinner: u32,
    pub snacks: u32,
}

/// Fixed 25/35/30/10 split of a day's calories.
pub fn daily_meal_split(daily_calories: f64) -> DailySplit {
    let part = |pct: f64| (daily_calories * pct).round().max(0.0) as u32;
    DailySplit {
        breakfast: part(0.25),
        lunch: part(0.35),
        dinner: part(0.30),
        snacks: part(0.10),
    }
}
