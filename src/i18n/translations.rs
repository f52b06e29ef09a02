//! Dictionary entries: (key, English, Hindi, Kannada).
//!
//! An empty translation falls back to English.

pub(crate) static TRANSLATIONS: &[(&str, &str, &str, &str)] = &[
    ("appName", "HDMC Civic Eye", "एचडीएमसी सिविक आई", "ಎಚ್‌ಡಿಎಂಸಿ ಸಿವಿಕ್ ಐ"),
    ("tagline", "Report. Track. Resolve.", "रिपोर्ट करें। ट्रैक करें। समाधान करें।", "ವರದಿ ಮಾಡಿ. ಟ್ರ್ಯಾಕ್ ಮಾಡಿ. ಪರಿಹರಿಸಿ."),
    ("subtitle", "Crowdsourced Civic Issue Reporting for Hubli-Dharwad", "हुबली-धारवाड़ के लिए क्राउडसोर्स्ड नागरिक समस्या रिपोर्टिंग", "ಹುಬ್ಬಳ್ಳಿ-ಧಾರವಾಡಕ್ಕಾಗಿ ಕ್ರೌಡ್‌ಸೋರ್ಸ್ಡ್ ನಾಗರಿಕ ಸಮಸ್ಯೆ ವರದಿ"),
    ("home", "Home", "होम", "ಮುಖಪುಟ"),
    ("reportIssue", "Report Issue", "समस्या रिपोर्ट करें", "ಸಮಸ್ಯೆ ವರದಿ ಮಾಡಿ"),
    ("viewIssues", "View Issues", "समस्याएं देखें", "ಸಮಸ್ಯೆಗಳನ್ನು ವೀಕ್ಷಿಸಿ"),
    ("capturePhoto", "Capture Photo", "फोटो खींचें", "ಫೋಟೋ ತೆಗೆಯಿರಿ"),
    ("retakePhoto", "Retake Photo", "फिर से फोटो खींचें", "ಮತ್ತೆ ಫೋಟೋ ತೆಗೆಯಿರಿ"),
    ("selectCategory", "Select Category", "श्रेणी चुनें", "ವರ್ಗ ಆಯ್ಕೆಮಾಡಿ"),
    ("describeIssue", "Describe the Issue", "समस्या का वर्णन करें", "ಸಮಸ್ಯೆಯನ್ನು ವಿವರಿಸಿ"),
    ("location", "Location", "स्थान", "ಸ್ಥಳ"),
    ("detectingLocation", "Detecting location...", "स्थान का पता लगाया जा रहा है...", "ಸ್ಥಳವನ್ನು ಪತ್ತೆ ಮಾಡಲಾಗುತ್ತಿದೆ..."),
    ("submitReport", "Submit Report", "रिपोर्ट जमा करें", "ವರದಿ ಸಲ್ಲಿಸಿ"),
    ("roads", "Roads & Potholes", "सड़कें और गड्ढे", "ರಸ್ತೆಗಳು ಮತ್ತು ಗುಂಡಿಗಳು"),
    ("drainage", "Drainage & Sewage", "जल निकासी और मल", "ಒಳಚರಂಡಿ ಮತ್ತು ಒಳಚರಂಡಿ"),
    ("garbage", "Garbage & Cleanliness", "कचरा और स्वच्छता", "ಕಸ ಮತ್ತು ಸ್ವಚ್ಛತೆ"),
    ("streetlights", "Street Lights", "स्ट्रीट लाइट", "ಬೀದಿ ದೀಪಗಳು"),
    ("water", "Water Supply", "जल आपूर्ति", "ನೀರು ಪೂರೈಕೆ"),
    ("encroachment", "Encroachment", "अतिक्रमण", "ಅತಿಕ್ರಮಣ"),
    ("other", "Other", "अन्य", "ಇತರೆ"),
    ("likes", "Likes", "लाइक्स", "ಲೈಕ್‌ಗಳು"),
    ("reports", "Reports", "रिपोर्ट्स", "ವರದಿಗಳು"),
    ("likeThis", "Support", "समर्थन करें", "ಬೆಂಬಲ"),
    ("reReport", "Re-report", "पुनः रिपोर्ट", "ಮರು-ವರದಿ"),
    ("status", "Status", "स्थिति", "ಸ್ಥಿತಿ"),
    ("pending", "Pending", "लंबित", "ಬಾಕಿ ಉಳಿದಿದೆ"),
    ("inProgress", "In Progress", "प्रगति में", "ಪ್ರಗತಿಯಲ್ಲಿದೆ"),
    ("resolved", "Resolved", "हल किया गया", "ಪರಿಹರಿಸಲಾಗಿದೆ"),
    ("reportedBy", "Reported by", "द्वारा रिपोर्ट किया गया", "ವರದಿ ಮಾಡಿದವರು"),
    ("assignedTo", "Assigned to", "को सौंपा गया", "ನಿಯೋಜಿಸಲಾಗಿದೆ"),
    ("heroTitle", "Your Voice Matters", "आपकी आवाज़ मायने रखती है", "ನಿಮ್ಮ ಧ್ವನಿ ಮುಖ್ಯ"),
    ("heroSubtitle", "Report civic issues in Hubli-Dharwad with a simple photo. Together, let's build a better city.", "एक साधारण फोटो के साथ हुबली-धारवाड़ में नागरिक समस्याओं की रिपोर्ट करें। आइए मिलकर एक बेहतर शहर बनाएं।", "ಸರಳ ಫೋಟೋದೊಂದಿಗೆ ಹುಬ್ಬಳ್ಳಿ-ಧಾರವಾಡದಲ್ಲಿ ನಾಗರಿಕ ಸಮಸ್ಯೆಗಳನ್ನು ವರದಿ ಮಾಡಿ. ಒಟ್ಟಿಗೆ, ಉತ್ತಮ ನಗರವನ್ನು ನಿರ್ಮಿಸೋಣ."),
    ("startReporting", "Start Reporting", "रिपोर्टिंग शुरू करें", "ವರದಿ ಮಾಡಲು ಪ್ರಾರಂಭಿಸಿ"),
    ("issuesReported", "Issues Reported", "रिपोर्ट की गई समस्याएं", "ವರದಿ ಮಾಡಲಾದ ಸಮಸ್ಯೆಗಳು"),
    ("issuesResolved", "Issues Resolved", "हल की गई समस्याएं", "ಪರಿಹರಿಸಿದ ಸಮಸ್ಯೆಗಳು"),
    ("activeCitizens", "Active Citizens", "सक्रिय नागरिक", "ಸಕ್ರಿಯ ನಾಗರಿಕರು"),
    ("poweredBy", "Powered by Citizens of Hubli-Dharwad", "हुबली-धारवाड़ के नागरिकों द्वारा संचालित", "ಹುಬ್ಬಳ್ಳಿ-ಧಾರವಾಡದ ನಾಗರಿಕರಿಂದ ನಡೆಸಲ್ಪಡುತ್ತದೆ"),
    ("reportSuccess", "Report submitted successfully! Officials have been notified.", "रिपोर्ट सफलतापूर्वक जमा की गई! अधिकारियों को सूचित कर दिया गया है।", "ವರದಿ ಯಶಸ್ವಿಯಾಗಿ ಸಲ್ಲಿಸಲಾಗಿದೆ! ಅಧಿಕಾರಿಗಳಿಗೆ ತಿಳಿಸಲಾಗಿದೆ."),
    ("likeSuccess", "Thanks for your support! This helps prioritize the issue.", "आपके समर्थन के लिए धन्यवाद! इससे समस्या को प्राथमिकता देने में मदद मिलती है।", "ನಿಮ್ಮ ಬೆಂಬಲಕ್ಕಾಗಿ ಧನ್ಯವಾದಗಳು! ಇದು ಸಮಸ್ಯೆಗೆ ಆದ್ಯತೆ ನೀಡಲು ಸಹಾಯ ಮಾಡುತ್ತದೆ."),
    ("reReportSuccess", "Re-reported successfully! The issue has been escalated.", "सफलतापूर्वक पुनः रिपोर्ट किया गया! समस्या को आगे बढ़ाया गया है।", "ಯಶಸ್ವಿಯಾಗಿ ಮರು-ವರದಿ ಮಾಡಲಾಗಿದೆ! ಸಮಸ್ಯೆಯನ್ನು ಉಲ್ಬಣಗೊಳಿಸಲಾಗಿದೆ."),
    ("recentIssues", "Recent Issues", "हाल की समस्याएं", "ಇತ್ತೀಚಿನ ಸಮಸ್ಯೆಗಳು"),
    ("viewAll", "View All", "सभी देखें", "ಎಲ್ಲವನ್ನೂ ವೀಕ್ಷಿಸಿ"),
    ("allowCamera", "Please allow camera access to capture issues", "समस्याओं को कैप्चर करने के लिए कृपया कैमरा एक्सेस की अनुमति दें", "ಸಮಸ್ಯೆಗಳನ್ನು ಸೆರೆಹಿಡಿಯಲು ದಯವಿಟ್ಟು ಕ್ಯಾಮೆರಾ ಪ್ರವೇಶವನ್ನು ಅನುಮತಿಸಿ"),
    ("cameraError", "Unable to access camera. Please check permissions.", "कैमरा एक्सेस करने में असमर्थ। कृपया अनुमतियां जांचें।", "ಕ್ಯಾಮೆರಾವನ್ನು ಪ್ರವೇಶಿಸಲು ಸಾಧ್ಯವಾಗುತ್ತಿಲ್ಲ. ದಯವಿಟ್ಟು ಅನುಮತಿಗಳನ್ನು ಪರಿಶೀಲಿಸಿ."),
    ("all", "All", "सभी", "ಎಲ್ಲಾ"),
    ("filterByCategory", "Filter by Category", "श्रेणी के अनुसार फ़िल्टर करें", "ವರ್ಗದ ಪ್ರಕಾರ ಫಿಲ್ಟರ್ ಮಾಡಿ"),
    ("filterByStatus", "Filter by Status", "स्थिति के अनुसार फ़िल्टर करें", "ಸ್ಥಿತಿಯ ಪ್ರಕಾರ ಫಿಲ್ಟರ್ ಮಾಡಿ"),
    ("sortBy", "Sort by", "इसके अनुसार क्रमबद्ध करें", "ಇದರ ಪ್ರಕಾರ ವಿಂಗಡಿಸಿ"),
    ("mostRecent", "Most Recent", "सबसे हाल का", "ಅತ್ಯಂತ ಇತ್ತೀಚಿನ"),
    ("mostLiked", "Most Supported", "सबसे अधिक समर्थित", "ಹೆಚ್ಚು ಬೆಂಬಲಿತ"),
    ("howItWorks", "How It Works", "यह कैसे काम करता है", "ಇದು ಹೇಗೆ ಕೆಲಸ ಮಾಡುತ್ತದೆ"),
    ("step1Title", "Capture the Issue", "समस्या को कैप्चर करें", "ಸಮಸ್ಯೆಯನ್ನು ಸೆರೆಹಿಡಿಯಿರಿ"),
    ("step1Desc", "Take a photo of the civic issue. Location is automatically detected.", "नागरिक समस्या की फोटो लें। स्थान स्वचालित रूप से पता लगाया जाता है।", "ನಾಗರಿಕ ಸಮಸ್ಯೆಯ ಫೋಟೋ ತೆಗೆಯಿರಿ. ಸ್ಥಳವನ್ನು ಸ್ವಯಂಚಾಲಿತವಾಗಿ ಪತ್ತೆ ಮಾಡಲಾಗುತ್ತದೆ."),
    ("step2Title", "Submit Report", "रिपोर्ट जमा करें", "ವರದಿ ಸಲ್ಲಿಸಿ"),
    ("step2Desc", "Select category and add description. Report goes to HDMC officials.", "श्रेणी चुनें और विवरण जोड़ें। रिपोर्ट HDMC अधिकारियों को जाती है।", "ವರ್ಗವನ್ನು ಆಯ್ಕೆಮಾಡಿ ಮತ್ತು ವಿವರಣೆ ಸೇರಿಸಿ. ವರದಿ HDMC ಅಧಿಕಾರಿಗಳಿಗೆ ಹೋಗುತ್ತದೆ."),
    ("step3Title", "Community Action", "सामुदायिक कार्रवाई", "ಸಮುದಾಯ ಕ್ರಮ"),
    ("step3Desc", "Others can like or re-report to boost priority. Track resolution progress.", "अन्य लोग प्राथमिकता बढ़ाने के लिए लाइक या री-रिपोर्ट कर सकते हैं। समाधान की प्रगति ट्रैक करें।", "ಇತರರು ಆದ್ಯತೆಯನ್ನು ಹೆಚ್ಚಿಸಲು ಲೈಕ್ ಅಥವಾ ಮರು-ವರದಿ ಮಾಡಬಹುದು. ಪರಿಹಾರ ಪ್ರಗತಿಯನ್ನು ಟ್ರ್ಯಾಕ್ ಮಾಡಿ."),
    ("login", "Login", "लॉगिन", "ಲಾಗಿನ್"),
    ("signup", "Sign Up", "साइन अप", "ಸೈನ್ ಅಪ್"),
    ("logout", "Log Out", "लॉग आउट", "ಲಾಗ್ ಔಟ್"),
    ("username", "Username", "उपयोगकर्ता नाम", "ಬಳಕೆದಾರ ಹೆಸರು"),
    ("password", "Password", "पासवर्ड", "ಪಾಸ್‌ವರ್ಡ್"),
    ("confirmPassword", "Confirm Password", "पासवर्ड की पुष्टि करें", "ಪಾಸ್‌ವರ್ಡ್ ದೃಢೀಕರಿಸಿ"),
    ("enterUsername", "Enter your username", "अपना उपयोगकर्ता नाम दर्ज करें", "ನಿಮ್ಮ ಬಳಕೆದಾರ ಹೆಸರನ್ನು ನಮೂದಿಸಿ"),
    ("enterPassword", "Enter your password", "अपना पासवर्ड दर्ज करें", "ನಿಮ್ಮ ಪಾಸ್‌ವರ್ಡ್ ನಮೂದಿಸಿ"),
    ("chooseUsername", "Choose a username", "एक उपयोगकर्ता नाम चुनें", "ಬಳಕೆದಾರ ಹೆಸರನ್ನು ಆಯ್ಕೆಮಾಡಿ"),
    ("createPassword", "Create a password", "एक पासवर्ड बनाएं", "ಪಾಸ್‌ವರ್ಡ್ ರಚಿಸಿ"),
    ("createAccount", "Create Account", "खाता बनाएं", "ಖಾತೆ ರಚಿಸಿ"),
    ("welcomeBack", "Welcome", "स्वागत है", "ಸ್ವಾಗತ"),
    ("authSubtitle", "Login or create an account to report issues", "समस्याओं की रिपोर्ट करने के लिए लॉगिन करें या खाता बनाएं", "ಸಮಸ್ಯೆಗಳನ್ನು ವರದಿ ಮಾಡಲು ಲಾಗಿನ್ ಮಾಡಿ ಅಥವಾ ಖಾತೆ ರಚಿಸಿ"),
    ("usernameHint", "At least 3 characters", "कम से कम 3 अक्षर", "ಕನಿಷ್ಠ 3 ಅಕ್ಷರಗಳು"),
    ("loginSuccess", "Logged in successfully!", "सफलतापूर्वक लॉगिन किया!", "ಯಶಸ್ವಿಯಾಗಿ ಲಾಗಿನ್ ಆಗಿದ್ದೀರಿ!"),
    ("signupSuccess", "Account created successfully!", "खाता सफलतापूर्वक बनाया गया!", "ಖಾತೆ ಯಶಸ್ವಿಯಾಗಿ ರಚಿಸಲಾಗಿದೆ!"),
    ("passwordMismatch", "Passwords do not match", "पासवर्ड मेल नहीं खाते", "ಪಾಸ್‌ವರ್ಡ್‌ಗಳು ಹೊಂದಾಣಿಕೆಯಾಗುತ್ತಿಲ್ಲ"),
    ("viewMyIssues", "View My Issues", "मेरी समस्याएं देखें", "ನನ್ನ ಸಮಸ್ಯೆಗಳನ್ನು ವೀಕ್ಷಿಸಿ"),
    ("myReportedIssues", "My Reported Issues", "मेरी रिपोर्ट की गई समस्याएं", "ನಾನು ವರದಿ ಮಾಡಿದ ಸಮಸ್ಯೆಗಳು"),
    ("reportNew", "Report New", "नई रिपोर्ट", "ಹೊಸ ವರದಿ"),
    ("noIssuesYet", "No issues reported yet", "अभी तक कोई समस्या रिपोर्ट नहीं की गई", "ಇನ್ನೂ ಯಾವುದೇ ಸಮಸ್ಯೆ ವರದಿ ಮಾಡಿಲ್ಲ"),
    ("noIssuesDesc", "Start reporting civic issues to help improve your city", "अपने शहर को बेहतर बनाने में मदद के लिए नागरिक समस्याओं की रिपोर्ट करना शुरू करें", "ನಿಮ್ಮ ನಗರವನ್ನು ಸುಧಾರಿಸಲು ಸಹಾಯ ಮಾಡಲು ನಾಗರಿಕ ಸಮಸ್ಯೆಗಳನ್ನು ವರದಿ ಮಾಡಲು ಪ್ರಾರಂಭಿಸಿ"),
    ("reportFirstIssue", "Report Your First Issue", "अपनी पहली समस्या रिपोर्ट करें", "ನಿಮ್ಮ ಮೊದಲ ಸಮಸ್ಯೆಯನ್ನು ವರದಿ ಮಾಡಿ"),
    ("loginRequired", "Please login to continue", "जारी रखने के लिए कृपया लॉगिन करें", "ಮುಂದುವರಿಸಲು ದಯವಿಟ್ಟು ಲಾಗಿನ್ ಮಾಡಿ"),
    ("loginToReport", "Login to Report Issue", "समस्या रिपोर्ट करने के लिए लॉगिन करें", "ಸಮಸ್ಯೆ ವರದಿ ಮಾಡಲು ಲಾಗಿನ್ ಮಾಡಿ"),
    ("loginToSupport", "Login to support this issue", "इस समस्या का समर्थन करने के लिए लॉगिन करें", "ಈ ಸಮಸ್ಯೆಯನ್ನು ಬೆಂಬಲಿಸಲು ಲಾಗಿನ್ ಮಾಡಿ"),
    // Added for the terminal client; not translated yet.
    ("feedbackTitle", "Rate the Resolution", "", ""),
    ("feedbackDescription", "Tell us how well this issue was handled", "", ""),
    ("additionalComments", "Additional Comments", "", ""),
    ("feedbackCommentsPlaceholder", "Anything else you want to share (optional)", "", ""),
    ("submitFeedback", "Submit Feedback", "", ""),
    ("feedbackSuccess", "Thank you for your feedback!", "", ""),
    ("feedbackError", "Could not submit feedback. Please try again.", "", ""),
    ("feedbackAlreadySubmitted", "You have already submitted feedback for this issue", "", ""),
    ("resolutionQuality", "Resolution Quality", "", ""),
    ("speedOfWork", "Speed of Work", "", ""),
    ("communication", "Communication", "", ""),
    ("overallExperience", "Overall Experience", "", ""),
    ("giveFeedback", "Give Feedback", "", ""),
    ("cancel", "Cancel", "", ""),
    ("adminDashboard", "Admin Dashboard", "", ""),
    ("adminTitle", "Admin Dashboard - Issues Database", "", ""),
    ("noIssuesInDatabase", "No issues in the database.", "", ""),
    ("deleteIssueTitle", "Delete Issue?", "", ""),
    ("deleteIssueBody", "This action cannot be undone. This will permanently delete the issue from the database.", "", ""),
    ("issueDeleted", "Issue deleted successfully", "", ""),
    ("deleteFailed", "Failed to delete issue", "", ""),
    ("statusUpdated", "Status updated successfully", "", ""),
    ("statusUpdateFailed", "Failed to update status", "", ""),
    ("loadFailed", "Failed to load issues", "", ""),
    ("exportDone", "Issues exported", "", ""),
    ("fillRequired", "Please fill all required fields", "", ""),
    ("noMatchingIssues", "No issues found matching your filters.", "", ""),
    ("locationUnavailable", "Location not available", "", ""),
    ("loading", "Loading...", "", ""),
    ("submitting", "Submitting...", "", ""),
    ("retryCamera", "Retry Camera", "", ""),
    ("startingCamera", "Starting camera...", "", ""),
    ("cameraReady", "Camera ready", "", ""),
    ("photoCaptured", "Photo captured", "", ""),
    ("captureRejected", "The photo looks blank. Please try again.", "", ""),
    ("citizen", "Citizen", "", ""),
    ("adminOnly", "Admin access required", "", ""),
];
