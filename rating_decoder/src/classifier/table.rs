//! Type-code table
//!
//! One row per known instruction type code, sorted by code. Adding a code is
//! a new row here; the category decides how the decoder treats it.

use super::{DateUnit, InstructionCategory, Quantifier};
use crate::ast::TypeCheckKind;
use InstructionCategory::*;

/// One row of the type-code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDef {
    pub code: i32,
    pub name: &'static str,
    pub category: InstructionCategory,
}

const fn def(code: i32, name: &'static str, category: InstructionCategory) -> InstructionDef {
    InstructionDef {
        code,
        name,
        category,
    }
}

/// All known type codes in ascending order
pub static INSTRUCTIONS: &[InstructionDef] = &[
    // === GENERAL ===
    def(-1, "Unknown", Unclassified),
    def(0, "Arithmetic", Arithmetic),
    def(1, "If", Conditional),
    def(2, "Call", Call),
    def(3, "Sort", Sort),
    def(4, "Mask", Mask),
    def(5, "Set String", Assignment),
    def(6, "Empty", NoOp),

    // === DRIVER AND VEHICLE ACTIONS ===
    def(7, "Flag Drivers All", RankingFlagging),
    def(8, "Flag Drivers from Flag Drivers", RankingFlagging),
    def(9, "Assign 1st Ranked Vehicle to Flag Driver", RankingFlagging),
    def(10, "Assign Vehicle Usually Driven by Flag Driver", RankingFlagging),
    def(11, "Assign 1st Ranked Vehicle to 1st Ranked Driver", RankingFlagging),
    def(12, "Assign Vehicle Usually Driven by Unassigned Drivers", RankingFlagging),
    def(13, "ISO Not Implemented", RankingFlagging),
    def(14, "Rank All Drivers Low to High", RankingFlagging),
    def(15, "Rank Flagged Drivers Low to High", RankingFlagging),
    def(16, "Rank All Drivers to All Vehicles", RankingFlagging),
    def(17, "Rank All Vehicles Low to High", RankingFlagging),
    def(18, "Rank Assigned Vehicles Low to High", RankingFlagging),
    def(19, "Rank Unassigned Vehicles Low to High", RankingFlagging),
    def(20, "Flag Drivers Assigned", RankingFlagging),
    def(21, "Flag Drivers Unassigned", RankingFlagging),
    def(22, "Assign Flag Driver to All Unassigned Vehicles", RankingFlagging),
    def(23, "Assign Flag Driver to First Unassigned Vehicle", RankingFlagging),
    def(24, "Modify Flag Drivers", RankingFlagging),
    def(25, "Modify All Drivers", RankingFlagging),
    def(26, "Assign Last Ranked Vehicle to Flagged Driver", RankingFlagging),
    def(27, "Assign Last Ranked Vehicle to Low Rated Driver", RankingFlagging),
    def(28, "Recalculate Vehicle Usage", RankingFlagging),
    def(29, "Flag Last Ranked Driver", RankingFlagging),
    def(30, "Flag 1st Ranked Driver", RankingFlagging),
    def(31, "Assign Vehicle Usually Driven by Ranked Driver High to Low", RankingFlagging),
    def(32, "Assign Vehicle Usually Driven by Ranked Driver Low to High", RankingFlagging),
    def(33, "Assign Vehicles by Driver Usage using 1st Ranked Vehicle", RankingFlagging),
    def(34, "Assign Vehicles by Driver Usage using Last Ranked Vehicle", RankingFlagging),
    def(35, "Assign Vehicles by Highest Premium Combination (Exclusive)", RankingFlagging),
    def(36, "Assign Vehicles by Lowest Premium Combination (Exclusive)", RankingFlagging),
    def(37, "Assign Vehicles by Highest Premium Combination (Non-Exclusive)", RankingFlagging),
    def(38, "Assign Vehicles by Lowest Premium Combination (Non-Exclusive)", RankingFlagging),
    def(39, "Rank All Drivers to All Unassigned Vehicles", RankingFlagging),
    def(40, "Assign Vehicles using DA Override Inputs", RankingFlagging),
    def(41, "Assign Vehicles to Highest Premium Driver", RankingFlagging),
    def(42, "Assign Vehicles to Lowest Premium Driver", RankingFlagging),
    def(43, "Rank All Drivers High to Low", RankingFlagging),
    def(44, "Rank Flagged Drivers High to Low", RankingFlagging),
    def(47, "Rank All Vehicles High to Low", RankingFlagging),
    def(48, "Rank Assigned Vehicles High to Low", RankingFlagging),
    def(49, "Rank Unassigned Vehicles High to Low", RankingFlagging),

    // === QUANTIFIED AND DATE CONDITIONS ===
    def(50, "If All (All Available)", QuantifiedConditional(Quantifier::All)),
    def(51, "If None (All Available)", QuantifiedConditional(Quantifier::None)),
    def(52, "If Any (All Available)", QuantifiedConditional(Quantifier::Any)),
    def(53, "If All (Use Current Path)", QuantifiedConditional(Quantifier::All)),
    def(54, "If None (Use Current Path)", QuantifiedConditional(Quantifier::None)),
    def(55, "If Any (Use Current Path)", QuantifiedConditional(Quantifier::Any)),
    def(56, "If Date", DateConditional),

    // === DATE DIFFERENCE ===
    def(57, "Date Difference (Days)", DateDifference(DateUnit::Days)),
    def(58, "Date Difference (Months)", DateDifference(DateUnit::Months)),
    def(59, "Date Difference (Years)", DateDifference(DateUnit::Years)),

    // === CATEGORY AGGREGATES ===
    def(60, "Sum Across Category (All Available)", MathFunction),
    def(61, "Product Across Category (All Available)", MathFunction),

    // === VEHICLE FLAGGING AND RANKING ===
    def(62, "Flag 1st Ranked Vehicle", RankingFlagging),
    def(63, "Flag Last Ranked Vehicle", RankingFlagging),
    def(64, "Flag All Vehicles", RankingFlagging),
    def(65, "Flag Assigned Vehicles", RankingFlagging),
    def(66, "Flag Unassigned Vehicles", RankingFlagging),
    def(67, "Flag Vehicle from Flagged Vehicle", RankingFlagging),
    def(68, "Modify Flagged Vehicle Inputs", RankingFlagging),
    def(69, "Modify All Vehicle Inputs", RankingFlagging),
    def(70, "Clear Vehicle Ranking", RankingFlagging),
    def(71, "Clear Driver Ranking", RankingFlagging),

    // === PRINCIPAL OPERATOR ===
    def(80, "Set Principal Operator Variable", RankingFlagging),
    def(81, "Assign Unassigned Vehicles by Principal Operator (Exclusive)", RankingFlagging),
    def(82, "Assign All Vehicles by Principal Operator (Non-Exclusive)", RankingFlagging),
    def(83, "Assign Unassigned Vehicles by Principal Operator (Non-Exclusive)", RankingFlagging),

    // === VALUE AND STRING FUNCTIONS ===
    def(84, "Absolute Value", MathFunction),
    def(85, "String Length", MathFunction),
    def(86, "String Addition", StringConcatenation),

    // === CATEGORY AGGREGATES (CURRENT PATH) ===
    def(87, "Sum Across Category (Use Current Path)", MathFunction),
    def(88, "Product Across Category (Use Current Path)", MathFunction),
    def(89, "Count Across Category (All Available)", MathFunction),
    def(90, "Count Across Category (Use Current Path)", MathFunction),

    // === CATEGORY RANKING AND TYPE CHECKS ===
    def(93, "Rank Across Category (All Available)", RankingFlagging),
    def(94, "Rank Across Category", RankingFlagging),
    def(95, "Is Date", TypeCheck(TypeCheckKind::Date)),
    def(97, "Clear Ranking", RankingFlagging),
    def(98, "Is Numeric", TypeCheck(TypeCheckKind::Numeric)),
    def(99, "Is Alpha", TypeCheck(TypeCheckKind::Alphabetic)),

    // === USAGE-DRIVEN ASSIGNMENT ===
    def(100, "Assign Vehicle Usually Driven All by Flag Driver", RankingFlagging),
    def(101, "Assign Vehicle Usually Driven All by Ranked Driver High to Low", RankingFlagging),
    def(102, "Assign Vehicle Usually Driven All by Ranked Driver Low to High", RankingFlagging),
    def(106, "Assign Vehicle Usually Driven All by Ranked Driver All High to Low", RankingFlagging),
    def(107, "Assign Vehicle Usually Driven All by Ranked Driver All Low to High", RankingFlagging),
    def(108, "Assign 1st Ranked Vehicle to 1st Ranked Driver with Exclusion", RankingFlagging),
    def(110, "Rank All Drivers vs All Vehicles Sequential", RankingFlagging),
    def(111, "Assign 1st Ranked Vehicle to 1st Ranked Driver Sequential", RankingFlagging),
    def(112, "Assign 1st Ranked Vehicle to 1st Ranked Driver Sequential with Exclusion", RankingFlagging),
    def(113, "Flag Drivers All (Usage Set)", RankingFlagging),
    def(114, "Rank All Drivers Low to High (Usage Set)", RankingFlagging),
    def(115, "Rank All Drivers High to Low (Usage Set)", RankingFlagging),
    def(116, "Assign 1st Ranked Vehicle to 1st Ranked Driver (Usage Set)", RankingFlagging),
    def(117, "Clear Driver Ranking (Usage Set)", RankingFlagging),
    def(118, "Rank All Drivers Low to High (Usage Set, Conditional)", RankingFlagging),
    def(119, "Rank All Drivers High to Low (Usage Set, Conditional)", RankingFlagging),

    // === CATEGORY ITEMS ===
    def(120, "Get Category Item (Use Current Path)", DataSource),
    def(121, "Set Category Item (Use Current Path)", Call),
    def(122, "Get Ranked Category Item", DataSource),
    def(123, "Set Ranked Category Item", Call),
    def(124, "Get Category Item (All Available)", DataSource),
    def(125, "Set Category Item (All Available)", Call),

    // === DATE ADDITION ===
    def(126, "Date Addition", DateAddition),

    // === MATH AND TRIGONOMETRY ===
    def(127, "Power", MathFunction),
    def(128, "Natural Log", MathFunction),
    def(129, "Log Base 10", MathFunction),
    def(130, "Exponential", MathFunction),
    def(131, "Random Number", MathFunction),
    def(132, "Factorial", MathFunction),
    def(133, "Square Root", MathFunction),
    def(134, "Ceiling", MathFunction),
    def(135, "Floor", MathFunction),
    def(136, "Even", MathFunction),
    def(137, "Odd", MathFunction),
    def(138, "Cosine", MathFunction),
    def(139, "Hyperbolic Cosine", MathFunction),
    def(140, "Arccosine", MathFunction),
    def(141, "Inverse Hyperbolic Cosine", MathFunction),
    def(142, "Sine", MathFunction),
    def(143, "Hyperbolic Sine", MathFunction),
    def(144, "Arcsine", MathFunction),
    def(145, "Inverse Hyperbolic Sine", MathFunction),
    def(146, "Tangent", MathFunction),
    def(147, "Hyperbolic Tangent", MathFunction),
    def(148, "Arctangent", MathFunction),
    def(149, "Inverse Hyperbolic Tangent", MathFunction),
    def(150, "Degrees", MathFunction),
    def(151, "Radians", MathFunction),

    // === ALTERNATE CATEGORY RANKING ===
    def(193, "Rank Across Category (All Available, Alt)", RankingFlagging),
    def(194, "Rank Across Category (Alt)", RankingFlagging),

    // === DATA SOURCE AND UNDERWRITING ===
    def(200, "Data Source", DataSource),
    def(254, "Set Underwriting To Fail", RankingFlagging),
];
