use axum::response::{Html, IntoResponse};

/// 首页处理器
pub async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Paddy Disease Detector</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #3a8d5c 0%, #1f5e38 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            color: #333;
        }

        .container {
            background: white;
            border-radius: 20px;
            padding: 40px;
            box-shadow: 0 20px 60px rgba(0, 0, 0, 0.15);
            max-width: 720px;
            width: 92%;
            text-align: center;
        }

        h1 { color: #2f7d4f; margin-bottom: 8px; font-size: 2.2em; }

        .subtitle { color: #666; margin-bottom: 26px; font-size: 1.05em; }

        .upload-area {
            border: 2px dashed #b7cfc0;
            border-radius: 15px;
            padding: 36px 20px;
            margin: 24px 0;
            cursor: pointer;
            transition: all 0.3s ease;
            background: #f6faf7;
        }

        .upload-area:hover, .upload-area.drag-over {
            border-color: #2f7d4f;
            background: #ecf5ef;
        }

        .upload-text { font-size: 1.15em; color: #4a5548; margin-bottom: 8px; }
        .upload-hint { color: #74806f; font-size: 0.9em; }

        #fileInput { display: none; }

        #preview {
            max-width: 100%;
            max-height: 260px;
            border-radius: 10px;
            margin: 12px 0;
            display: none;
        }

        .btn {
            background: linear-gradient(135deg, #2f7d4f, #3a8d5c);
            color: white;
            border: none;
            padding: 14px 30px;
            border-radius: 10px;
            font-size: 1.05em;
            cursor: pointer;
            margin: 10px;
            min-width: 160px;
        }

        .btn:disabled { opacity: 0.6; cursor: not-allowed; }

        .loading { display: none; color: #2f7d4f; margin: 18px 0; }

        .result { margin-top: 24px; text-align: left; display: none; }

        .result-label {
            background: #ecf5ef;
            border: 1px solid #cfe3d5;
            border-radius: 10px;
            padding: 14px;
            font-size: 1.2em;
            font-weight: 600;
            color: #1f5e38;
        }

        .result-block {
            background: #f8fafc;
            border: 1px solid #e2e8f0;
            border-radius: 10px;
            padding: 12px;
            margin: 10px 0;
        }

        .result-block h4 { margin-bottom: 6px; color: #445; }

        .fallback {
            background: #fff8e6;
            border: 1px solid #f0dfae;
            border-radius: 10px;
            padding: 12px;
            margin: 10px 0;
            color: #8a6d1a;
            display: none;
        }

        .error {
            background: #fdf0f0;
            border: 1px solid #f2c4c4;
            border-radius: 10px;
            padding: 12px;
            margin: 10px 0;
            color: #a33;
            display: none;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>&#127806; Paddy Disease Detector</h1>
        <p class="subtitle">Upload an image of a paddy leaf to detect the disease and get the solution.</p>

        <div class="upload-area" id="uploadArea">
            <div class="upload-text">&#128193; Click or drop a leaf photo here</div>
            <div class="upload-hint">JPEG or PNG, max 50MB</div>
        </div>

        <input type="file" id="fileInput" accept="image/*">
        <img id="preview" alt="Uploaded leaf">

        <button class="btn" id="detectBtn" disabled>Detect Disease</button>

        <div class="loading" id="loading">Analyzing the leaf, please wait...</div>

        <div class="error" id="error"></div>

        <div class="result" id="result">
            <div class="result-label" id="resultLabel"></div>
            <div class="result-block" id="reasonBlock">
                <h4>&#128204; Reason</h4>
                <div id="reasonText"></div>
            </div>
            <div class="result-block" id="solutionBlock">
                <h4>&#129514; Solution</h4>
                <div id="solutionText"></div>
            </div>
            <div class="fallback" id="fallback">
                No additional information available for this disease.
            </div>
        </div>
    </div>

    <script>
        const uploadArea = document.getElementById('uploadArea');
        const fileInput = document.getElementById('fileInput');
        const detectBtn = document.getElementById('detectBtn');
        const loading = document.getElementById('loading');
        const result = document.getElementById('result');
        const errorBox = document.getElementById('error');
        const preview = document.getElementById('preview');

        let selectedFile = null;

        uploadArea.addEventListener('click', () => fileInput.click());
        fileInput.addEventListener('change', (e) => handleFile(e.target.files[0]));

        uploadArea.addEventListener('dragover', (e) => {
            e.preventDefault();
            uploadArea.classList.add('drag-over');
        });
        uploadArea.addEventListener('dragleave', (e) => {
            e.preventDefault();
            uploadArea.classList.remove('drag-over');
        });
        uploadArea.addEventListener('drop', (e) => {
            e.preventDefault();
            uploadArea.classList.remove('drag-over');
            handleFile(e.dataTransfer.files[0]);
        });

        function handleFile(file) {
            if (!file) return;
            if (!file.type.startsWith('image/')) {
                showError('Please select an image file.');
                return;
            }
            selectedFile = file;
            preview.src = URL.createObjectURL(file);
            preview.style.display = 'block';
            uploadArea.querySelector('.upload-text').textContent = '✅ Selected: ' + file.name;
            detectBtn.disabled = false;
            result.style.display = 'none';
            errorBox.style.display = 'none';
        }

        detectBtn.addEventListener('click', async () => {
            if (!selectedFile) return;

            detectBtn.disabled = true;
            loading.style.display = 'block';
            result.style.display = 'none';
            errorBox.style.display = 'none';

            try {
                const formData = new FormData();
                formData.append('file', selectedFile);

                const response = await fetch('/predict/upload', {
                    method: 'POST',
                    body: formData
                });
                const body = await response.json();

                if (body.success) {
                    displayResult(body.data);
                } else {
                    throw new Error((body.error && body.error.message) || 'Prediction failed');
                }
            } catch (err) {
                showError('Prediction failed: ' + err.message);
            } finally {
                detectBtn.disabled = false;
                loading.style.display = 'none';
            }
        });

        function displayResult(data) {
            document.getElementById('resultLabel').textContent =
                '\u{1FA7A} Detected Disease: ' + data.label +
                ' (' + (data.confidence * 100).toFixed(1) + '%)';

            const hasInfo = data.info_available;
            document.getElementById('reasonBlock').style.display = hasInfo ? 'block' : 'none';
            document.getElementById('solutionBlock').style.display = hasInfo ? 'block' : 'none';
            document.getElementById('fallback').style.display = hasInfo ? 'none' : 'block';

            if (hasInfo) {
                document.getElementById('reasonText').textContent = data.reason;
                document.getElementById('solutionText').textContent = data.solution;
            }

            result.style.display = 'block';
        }

        function showError(message) {
            errorBox.textContent = message;
            errorBox.style.display = 'block';
        }
    </script>
</body>
</html>"#;
