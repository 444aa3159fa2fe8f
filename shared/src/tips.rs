//! Health recommendations per BMI category

use crate::bmi::Category;

/// Number of tips every category carries
pub const TIPS_PER_CATEGORY: usize = 4;

const UNDERWEIGHT_TIPS: [&str; TIPS_PER_CATEGORY] = [
    "Consider consulting a healthcare provider about healthy weight gain",
    "Focus on nutrient-dense foods and regular meals",
    "Include strength training to build muscle mass",
    "Monitor your health with regular check-ups",
];

const NORMAL_TIPS: [&str; TIPS_PER_CATEGORY] = [
    "Great job! You're in the healthy weight range",
    "Maintain your current lifestyle with balanced diet",
    "Continue regular physical activity (150 min/week)",
    "Keep monitoring your weight regularly",
];

const OVERWEIGHT_TIPS: [&str; TIPS_PER_CATEGORY] = [
    "Consider gradual weight loss through diet and exercise",
    "Focus on reducing portion sizes and calorie intake",
    "Increase physical activity to 300 minutes per week",
    "Consult a healthcare provider for personalized advice",
];

const OBESE_TIPS: [&str; TIPS_PER_CATEGORY] = [
    "Consult a healthcare provider for a comprehensive plan",
    "Consider working with a registered dietitian",
    "Start with low-impact exercises like walking",
    "Focus on sustainable lifestyle changes, not quick fixes",
];

/// Ordered recommendations for a category
pub fn tips_for(category: Category) -> &'static [&'static str; TIPS_PER_CATEGORY] {
    match category {
        Category::Underweight => &UNDERWEIGHT_TIPS,
        Category::Normal => &NORMAL_TIPS,
        Category::Overweight => &OVERWEIGHT_TIPS,
        Category::Obese => &OBESE_TIPS,
    }
}
