//! Static FAQ content shown below the calculator

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: [FaqEntry; 6] = [
    FaqEntry {
        question: "What is BMI?",
        answer: "Body Mass Index (BMI) is a measurement that uses your height and weight to determine if you're a healthy weight. It's calculated by dividing your weight in kilograms by your height in meters squared (kg/m²). While BMI is a useful screening tool, it's not a diagnostic measure and doesn't directly measure body fat.",
    },
    FaqEntry {
        question: "Is BMI accurate for everyone?",
        answer: "BMI has limitations and may not be accurate for everyone. It doesn't distinguish between muscle and fat mass, so athletes with high muscle mass may have high BMIs despite being healthy. It's also less accurate for older adults, pregnant women, and may vary by ethnicity. Always consult healthcare professionals for comprehensive health assessment.",
    },
    FaqEntry {
        question: "What's considered a healthy BMI?",
        answer: "According to WHO standards: Underweight (BMI < 18.5), Normal weight (BMI 18.5-24.9), Overweight (BMI 25-29.9), Obese Class I (BMI 30-34.9), Obese Class II (BMI 35-39.9), Obese Class III (BMI ≥ 40). However, optimal BMI can vary based on individual factors like age, muscle mass, and overall health.",
    },
    FaqEntry {
        question: "How can I improve my BMI?",
        answer: "To achieve a healthy BMI: maintain a balanced diet with appropriate calorie intake, engage in regular physical activity (150+ minutes of moderate exercise weekly), stay hydrated, get adequate sleep (7-9 hours), manage stress, and avoid crash diets. Focus on gradual, sustainable lifestyle changes rather than quick fixes.",
    },
    FaqEntry {
        question: "How often should I check my BMI?",
        answer: "For general monitoring, checking BMI monthly is sufficient. If you're actively working on weight management, weekly checks can help track progress. Daily weighing isn't recommended as weight naturally fluctuates. Focus on long-term trends rather than daily variations. Always combine BMI tracking with other health markers.",
    },
    FaqEntry {
        question: "Can BMI predict health risks?",
        answer: "BMI can indicate potential health risks associated with being underweight or overweight, including cardiovascular disease, diabetes, and certain cancers. However, it's just one factor. Waist circumference, body composition, fitness level, family history, and other health markers provide a more complete health picture.",
    },
];

/// Disclaimer printed with every result
pub const DISCLAIMER: &str =
    "BMI is a screening tool and not a diagnostic tool. Consult healthcare professionals for medical advice.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faq_order_and_content() {
        assert_eq!(FAQ[0].question, "What is BMI?");
        assert_eq!(FAQ[5].question, "Can BMI predict health risks?");
        assert!(FAQ.iter().all(|entry| !entry.answer.is_empty()));
    }
}
